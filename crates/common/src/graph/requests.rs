use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::GraphError;
use super::models::{Collection, Drive, DriveItem, Site, Subscription, SubscriptionRequest};

/// A typed Graph call: knows how to build itself against a base url and
/// what it deserializes into.
pub trait GraphRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, GraphError>;

    fn accepts(status: StatusCode) -> bool {
        status.is_success()
    }
}

/// Join a relative Graph path onto the configured base (which carries the
/// api version, e.g. `https://graph.microsoft.com/v1.0`).
pub(crate) fn endpoint(base_url: &Url, path: &str) -> Result<Url, GraphError> {
    let base = base_url.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))?)
}

#[derive(Debug, Clone)]
pub struct GetSite {
    pub host: String,
    pub path: String,
}

impl GetSite {
    fn relative_path(&self) -> String {
        if self.path.starts_with('/') {
            format!("sites/{}:{}", self.host, self.path)
        } else {
            format!("sites/{}:/{}", self.host, self.path)
        }
    }
}

impl GraphRequest for GetSite {
    type Response = Site;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, GraphError> {
        Ok(client.get(endpoint(base_url, &self.relative_path())?))
    }
}

#[derive(Debug, Clone)]
pub struct ListDrives {
    pub site_id: String,
}

impl GraphRequest for ListDrives {
    type Response = Collection<Drive>;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, GraphError> {
        let path = format!("sites/{}/drives", self.site_id);
        Ok(client.get(endpoint(base_url, &path)?))
    }
}

/// Root-level children of a drive. Only the first page is requested.
#[derive(Debug, Clone)]
pub struct ListRootChildren {
    pub drive_id: String,
}

impl GraphRequest for ListRootChildren {
    type Response = Collection<DriveItem>;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, GraphError> {
        let path = format!("drives/{}/root/children", self.drive_id);
        Ok(client.get(endpoint(base_url, &path)?))
    }
}

#[derive(Debug, Clone)]
pub struct CreateSubscription(pub SubscriptionRequest);

impl GraphRequest for CreateSubscription {
    type Response = Subscription;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, GraphError> {
        Ok(client.post(endpoint(base_url, "subscriptions")?).json(&self.0))
    }

    fn accepts(status: StatusCode) -> bool {
        status == StatusCode::CREATED
    }
}
