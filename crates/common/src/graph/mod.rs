//! Microsoft Graph: site/drive resolution, item download and change
//! subscriptions.

mod client;
mod error;
mod models;
mod requests;
mod resolve;

pub use client::{GraphClient, DEFAULT_GRAPH_BASE_URL};
pub use error::GraphError;
pub use models::{
    ChangeNotification, Collection, Drive, DriveItem, FileFacet, FolderFacet, NotificationBatch,
    Site, Subscription, SubscriptionRequest,
};
pub use requests::{CreateSubscription, GetSite, GraphRequest, ListDrives, ListRootChildren};
pub use resolve::{DriveSelection, SiteLocator};
