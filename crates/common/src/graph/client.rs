use bytes::Bytes;
use reqwest::Client;
use url::Url;

use crate::identity::AccessToken;

use super::error::GraphError;
use super::requests::{endpoint, GraphRequest};

pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

#[derive(Debug, Clone)]
pub struct GraphClient {
    pub base_url: Url,
    client: Client,
}

impl GraphClient {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { base_url, client }
    }

    /// Send a typed request with the given bearer token.
    ///
    /// Any status the request does not accept aborts with
    /// [`GraphError::HttpStatus`] carrying the response body.
    pub async fn call<T: GraphRequest>(
        &self,
        token: &AccessToken,
        request: T,
    ) -> Result<T::Response, GraphError> {
        let request_builder = request.build_request(&self.base_url, &self.client)?;
        let response = request_builder.bearer_auth(token.secret()).send().await?;

        let status = response.status();
        if T::accepts(status) {
            Ok(response.json::<T::Response>().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("graph request failed: {} - {}", status.as_u16(), body);
            Err(GraphError::HttpStatus(status, body))
        }
    }

    /// Download the binary content of a drive item. Graph answers with a
    /// redirect to a pre-authenticated url, which the client follows.
    pub async fn download_item(
        &self,
        token: &AccessToken,
        drive_id: &str,
        item_id: &str,
    ) -> Result<Bytes, GraphError> {
        let url = endpoint(
            &self.base_url,
            &format!("drives/{}/items/{}/content", drive_id, item_id),
        )?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token.secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::HttpStatus(status, body));
        }
        Ok(response.bytes().await?)
    }
}
