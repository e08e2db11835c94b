mod error;
mod notifications;
mod register_subscription;
mod sync_files;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{SyncError, TransferError};
pub use notifications::{check_client_state, process_notifications, ClientStateCheck, NotificationOutcome};
pub use register_subscription::{
    expiration_timestamp, register_subscription, subscription_request, SubscriptionOptions,
    DEFAULT_EXPIRATION_DAYS,
};
pub use sync_files::{sync_files, SyncReport};
