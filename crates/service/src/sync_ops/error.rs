use common::prelude::{GraphError, IdentityError, StorageError};

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("failed to sync file '{file}': {source}")]
    Transfer {
        file: String,
        /// Names uploaded earlier in the same run
        synced: Vec<String>,
        #[source]
        source: TransferError,
    },
    #[error("subscription expiration must be between 1 and 29 days, got {0}")]
    InvalidExpiration(i64),
}

impl SyncError {
    /// Files that made it to storage before the run aborted.
    pub fn synced(&self) -> &[String] {
        match self {
            SyncError::Transfer { synced, .. } => synced,
            _ => &[],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("download failed: {0}")]
    Download(#[from] GraphError),
    #[error("upload failed: {0}")]
    Upload(#[from] StorageError),
}
