use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use url::Url;

use super::connection_string::{ConnectionString, StorageAuth};
use super::error::StorageError;
use super::shared_key::{self, SignedRequest};

pub const BLOB_API_VERSION: &str = "2021-08-06";

const OCTET_STREAM: &str = "application/octet-stream";

/// Destination for synced file content. Writing a name that already
/// exists replaces it.
#[async_trait]
pub trait BlobSink: Send + Sync {
    async fn put_blob(&self, name: &str, content: Bytes) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct BlobContainerClient {
    client: Client,
    connection: ConnectionString,
    container: String,
}

impl BlobContainerClient {
    pub fn new(client: Client, connection: ConnectionString, container: impl Into<String>) -> Self {
        Self {
            client,
            connection,
            container: container.into(),
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Url of a blob in this container, each path segment of the name
    /// percent-encoded. No SAS is attached.
    pub fn blob_url(&self, name: &str) -> Result<Url, StorageError> {
        let base = self.connection.blob_endpoint.as_str().trim_end_matches('/');
        let encoded = name
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Ok(Url::parse(&format!(
            "{}/{}/{}",
            base,
            urlencoding::encode(&self.container),
            encoded
        ))?)
    }

    fn ms_headers() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("x-ms-blob-type".to_string(), "BlockBlob".to_string()),
            (
                "x-ms-date".to_string(),
                Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            ),
            ("x-ms-version".to_string(), BLOB_API_VERSION.to_string()),
        ])
    }
}

#[async_trait]
impl BlobSink for BlobContainerClient {
    async fn put_blob(&self, name: &str, content: Bytes) -> Result<(), StorageError> {
        let mut url = self.blob_url(name)?;
        let ms_headers = Self::ms_headers();

        let mut headers = HeaderMap::new();
        for (key, value) in &ms_headers {
            headers.insert(HeaderName::from_bytes(key.as_bytes())?, HeaderValue::from_str(value)?);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(OCTET_STREAM));

        match &self.connection.auth {
            StorageAuth::SharedKey { account, key } => {
                let to_sign = shared_key::string_to_sign(
                    account,
                    &SignedRequest {
                        method: "PUT",
                        content_length: content.len(),
                        content_type: OCTET_STREAM,
                        ms_headers: &ms_headers,
                        url: &url,
                    },
                );
                let signature = shared_key::sign(key, &to_sign)?;
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("SharedKey {}:{}", account, signature))?,
                );
            }
            StorageAuth::Sas(sas) => url.set_query(Some(sas)),
        }

        tracing::debug!(container = %self.container, blob = name, size = content.len(), "uploading blob");
        let response = self
            .client
            .put(url)
            .headers(headers)
            .body(content)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("blob upload failed: {} - {}", status.as_u16(), body);
            return Err(StorageError::HttpStatus(status, body));
        }
        Ok(())
    }
}
