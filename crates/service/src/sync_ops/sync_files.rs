use std::fmt;

use serde::Serialize;

use crate::ServiceState;

use super::error::{SyncError, TransferError};

/// Names uploaded by one pipeline run, in upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub files_synced: Vec<String>,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "synced {} file(s)", self.files_synced.len())?;
        for name in &self.files_synced {
            write!(f, "\n  {}", name)?;
        }
        Ok(())
    }
}

/// Copy every file at the root of the configured document library into
/// the blob container, one at a time.
///
/// A fresh token is fetched and the drive is re-resolved on every call.
/// The first failing file aborts the run; the error carries the names
/// already uploaded.
pub async fn sync_files(state: &ServiceState) -> Result<SyncReport, SyncError> {
    let config = state.config();
    let credentials = config.credentials()?;
    let locator = config.site_locator()?;
    let sink = state.blob_sink()?;

    let token = state.identity().fetch_token(&credentials).await?;
    let drive = state
        .graph()
        .resolve_drive(&token, &locator, config.library_match)
        .await?;
    let items = state.graph().list_root_items(&token, &drive.id).await?;

    let mut synced = Vec::new();
    for item in items {
        if !item.is_file() {
            tracing::debug!(name = %item.name, "skipping non-file item");
            continue;
        }

        tracing::info!("Syncing file: {}", item.name);
        let transfer = async {
            let content = state
                .graph()
                .download_item(&token, &drive.id, &item.id)
                .await?;
            sink.put_blob(&item.name, content).await?;
            Ok::<_, TransferError>(())
        }
        .await;

        if let Err(source) = transfer {
            tracing::error!(file = %item.name, synced = synced.len(), "sync aborted: {}", source);
            return Err(SyncError::Transfer {
                file: item.name,
                synced,
                source,
            });
        }
        synced.push(item.name);
    }

    tracing::info!(drive = %drive.name, count = synced.len(), "sync complete");
    Ok(SyncReport {
        files_synced: synced,
    })
}
