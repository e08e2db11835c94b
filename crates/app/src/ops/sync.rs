use clap::Args;

use service::sync_ops::sync_files;
use service::{init_logging, ServiceState, ServiceStateSetupError, SyncError, SyncReport};

/// Run the sync pipeline once and exit.
#[derive(Args, Debug, Clone)]
pub struct SyncNow;

#[derive(Debug, thiserror::Error)]
pub enum SyncNowError {
    #[error("state error: {0}")]
    State(#[from] ServiceStateSetupError),
    #[error("sync failed: {0}")]
    Sync(#[from] SyncError),
}

#[async_trait::async_trait]
impl crate::op::Op for SyncNow {
    type Error = SyncNowError;
    type Output = SyncReport;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let _guard = init_logging(ctx.config.log_level);
        ctx.config.report();

        let state = ServiceState::from_config(&ctx.config)?;
        let report = sync_files(&state).await.map_err(|e| {
            if !e.synced().is_empty() {
                tracing::warn!(synced = ?e.synced(), "files uploaded before the failure");
            }
            e
        })?;
        Ok(report)
    }
}
