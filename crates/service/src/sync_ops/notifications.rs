use common::prelude::NotificationBatch;

use crate::ServiceState;

use super::error::SyncError;
use super::sync_files::{sync_files, SyncReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStateCheck {
    /// Notification carried no client state
    Absent,
    Valid,
    /// Carried a client state we did not issue, or none is configured
    Mismatch,
}

impl ClientStateCheck {
    pub fn should_sync(&self) -> bool {
        !matches!(self, ClientStateCheck::Mismatch)
    }
}

pub fn check_client_state(received: Option<&str>, expected: Option<&str>) -> ClientStateCheck {
    match received.filter(|state| !state.is_empty()) {
        None => ClientStateCheck::Absent,
        Some(received) if Some(received) == expected => ClientStateCheck::Valid,
        Some(_) => ClientStateCheck::Mismatch,
    }
}

#[derive(Debug, Default)]
pub struct NotificationOutcome {
    /// One report per notification that triggered a sync
    pub runs: Vec<SyncReport>,
    pub skipped: usize,
}

/// Run the sync pipeline once for every notification in the batch that
/// passes the client state check. Stops at the first failed run.
pub async fn process_notifications(
    state: &ServiceState,
    batch: &NotificationBatch,
) -> Result<NotificationOutcome, SyncError> {
    let expected = state.config().webhook_client_state.as_deref();
    let mut outcome = NotificationOutcome::default();

    for notification in &batch.value {
        let received = notification.client_state.as_deref();
        let check = check_client_state(received, expected);
        tracing::info!(
            subscription = ?notification.subscription_id,
            resource = ?notification.resource,
            "notification client state: {:?}",
            check
        );

        if !check.should_sync() {
            tracing::warn!("Invalid client state received. Sync skipped.");
            outcome.skipped += 1;
            continue;
        }

        tracing::info!("Client state valid or not provided. Starting sync...");
        outcome.runs.push(sync_files(state).await?);
    }

    Ok(outcome)
}
