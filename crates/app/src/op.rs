use std::error::Error;
use std::path::Path;

use service::{ServiceConfig, ServiceConfigError};

#[derive(Clone)]
pub struct OpContext {
    /// Loaded once; every op works from the same snapshot
    pub config: ServiceConfig,
}

impl OpContext {
    /// Load from a settings file when given, otherwise the environment.
    pub fn new(settings: Option<&Path>) -> Result<Self, ServiceConfigError> {
        let config = match settings {
            Some(path) => ServiceConfig::from_settings_file(path)?,
            None => ServiceConfig::from_env()?,
        };
        Ok(Self { config })
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
