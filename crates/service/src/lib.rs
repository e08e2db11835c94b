pub mod http_server;
mod process;
pub mod sync_ops;

mod config;
mod state;

pub use config::{
    Config as ServiceConfig, ConfigError as ServiceConfigError, ConfigSource, REQUIRED_KEYS,
};
pub use process::{init_logging, spawn_service};
pub use state::{State as ServiceState, StateSetupError as ServiceStateSetupError};
pub use sync_ops::{SyncError, SyncReport};
