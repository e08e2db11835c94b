use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use mockito::{Mock, ServerGuard};

use common::prelude::{BlobSink, StorageError};

use crate::config::Config;
use crate::ServiceState;

pub const TENANT: &str = "tenant-1";
pub const CLIENT_STATE: &str = "s3cret-state";
pub const SITE_ID: &str = "contoso.sharepoint.com,abc,def";
pub const DRIVE_ID: &str = "b!docs";

#[derive(Default)]
pub struct MemorySink {
    blobs: Mutex<Vec<(String, Bytes)>>,
}

impl MemorySink {
    pub fn names(&self) -> Vec<String> {
        self.blobs
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn content(&self, name: &str) -> Option<Bytes> {
        self.blobs
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, content)| content.clone())
    }
}

#[async_trait]
impl BlobSink for MemorySink {
    async fn put_blob(&self, name: &str, content: Bytes) -> Result<(), StorageError> {
        self.blobs.lock().unwrap().push((name.to_string(), content));
        Ok(())
    }
}

pub fn config_for(server: &ServerGuard) -> Config {
    let url = server.url();
    Config::from_lookup(|key| {
        let value = match key {
            "TENANT_ID" => TENANT.to_string(),
            "CLIENT_ID" => "client-1".to_string(),
            "CLIENT_SECRET" => "client-secret".to_string(),
            "SHAREPOINT_SITE" => "contoso.sharepoint.com".to_string(),
            "SITE_PATH" => "/sites/legal".to_string(),
            "LIST_NAME" => "Documents".to_string(),
            "WEBHOOK_CLIENT_STATE" => CLIENT_STATE.to_string(),
            "CONTAINER_NAME" => "sync".to_string(),
            "STORAGE_CONNECTION_STRING" => "UseDevelopmentStorage=true".to_string(),
            "AUTHORITY_HOST" => url.clone(),
            "GRAPH_BASE_URL" => format!("{}/v1.0", url),
            _ => return None,
        };
        Some(value)
    })
    .unwrap()
}

pub fn state_for(server: &ServerGuard, sink: Arc<MemorySink>) -> ServiceState {
    ServiceState::from_config(&config_for(server))
        .unwrap()
        .with_blob_sink(sink)
}

pub async fn mock_token(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", format!("/{}/oauth2/v2.0/token", TENANT).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"tok","token_type":"Bearer","expires_in":3599}"#)
        .create_async()
        .await
}

/// Site lookup plus a drive listing holding `Documents`.
pub async fn mock_drive(server: &mut ServerGuard) -> (Mock, Mock) {
    let site = server
        .mock("GET", "/v1.0/sites/contoso.sharepoint.com:/sites/legal")
        .match_header("authorization", "Bearer tok")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"id":"{}"}}"#, SITE_ID))
        .create_async()
        .await;
    let drives = server
        .mock("GET", format!("/v1.0/sites/{}/drives", SITE_ID).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"value":[{{"id":"b!assets","name":"Site Assets"}},{{"id":"{}","name":"Documents"}}]}}"#,
            DRIVE_ID
        ))
        .create_async()
        .await;
    (site, drives)
}

pub async fn mock_children(server: &mut ServerGuard, body: &str) -> Mock {
    server
        .mock("GET", format!("/v1.0/drives/{}/root/children", DRIVE_ID).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

pub async fn mock_content(server: &mut ServerGuard, item_id: &str, status: usize, body: &str) -> Mock {
    server
        .mock(
            "GET",
            format!("/v1.0/drives/{}/items/{}/content", DRIVE_ID, item_id).as_str(),
        )
        .with_status(status)
        .with_body(body.to_string())
        .create_async()
        .await
}
