/**
 * Microsoft Graph client.
 *  - Site and document library resolution
 *  - Drive item listing and download
 *  - Change notification subscriptions
 */
pub mod graph;
/**
 * Client-credentials tokens from the
 *  Microsoft identity platform.
 */
pub mod identity;
/**
 * Azure Blob Storage uploads.
 *  Connection string parsing, Shared Key
 *  signing and SAS support.
 */
pub mod storage;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::graph::{
        ChangeNotification, Drive, DriveItem, DriveSelection, GraphClient, GraphError,
        NotificationBatch, SiteLocator, Subscription, SubscriptionRequest,
    };
    pub use crate::identity::{AccessToken, Credentials, IdentityError, TokenProvider};
    pub use crate::storage::{
        BlobContainerClient, BlobSink, ConnectionString, ConnectionStringError, StorageError,
    };
    pub use crate::version::build_info;
}
