use clap::Args;

use service::sync_ops::{register_subscription, SubscriptionOptions};
use service::{init_logging, ServiceState, ServiceStateSetupError, SyncError};

/// Register a Graph change subscription for the configured library.
#[derive(Args, Debug, Clone)]
pub struct Subscribe {
    #[command(flatten)]
    pub options: SubscriptionOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error("state error: {0}")]
    State(#[from] ServiceStateSetupError),
    #[error("failed to register webhook: {0}")]
    Register(#[from] SyncError),
    #[error("failed to render subscription: {0}")]
    Render(#[from] serde_json::Error),
}

#[async_trait::async_trait]
impl crate::op::Op for Subscribe {
    type Error = SubscribeError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let _guard = init_logging(ctx.config.log_level);
        ctx.config.report();

        let state = ServiceState::from_config(&ctx.config)?;
        let subscription = register_subscription(&state, &self.options).await?;
        Ok(serde_json::to_string_pretty(&subscription)?)
    }
}
