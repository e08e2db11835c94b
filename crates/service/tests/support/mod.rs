#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use bytes::Bytes;
use mockito::{Mock, ServerGuard};
use tower::ServiceExt;

use common::prelude::{BlobSink, StorageError};
use service::{ServiceConfig, ServiceState};

pub const TENANT: &str = "tenant-1";
pub const CLIENT_STATE: &str = "s3cret-state";
pub const SITE_ID: &str = "contoso.sharepoint.com,abc,def";
pub const DRIVE_ID: &str = "b!docs";

/// Captures uploads instead of talking to a storage account.
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
}

#[async_trait]
impl BlobSink for MemorySink {
    async fn put_blob(&self, name: &str, content: Bytes) -> Result<(), StorageError> {
        self.blobs.lock().unwrap().push((name.to_string(), content));
        Ok(())
    }
}

pub struct Harness {
    pub server: ServerGuard,
    pub sink: Arc<MemorySink>,
    overrides: HashMap<&'static str, String>,
}

impl Harness {
    pub async fn new() -> Self {
        Self {
            server: mockito::Server::new_async().await,
            sink: Arc::new(MemorySink::default()),
            overrides: HashMap::new(),
        }
    }

    pub fn set(&mut self, key: &'static str, value: &str) -> &mut Self {
        self.overrides.insert(key, value.to_string());
        self
    }

    pub fn config(&self) -> ServiceConfig {
        let url = self.server.url();
        let mut values: HashMap<&str, String> = HashMap::from([
            ("TENANT_ID", TENANT.to_string()),
            ("CLIENT_ID", "client-1".to_string()),
            ("CLIENT_SECRET", "client-secret".to_string()),
            ("SHAREPOINT_SITE", "contoso.sharepoint.com".to_string()),
            ("SITE_PATH", "/sites/legal".to_string()),
            ("LIST_NAME", "Documents".to_string()),
            ("WEBHOOK_CLIENT_STATE", CLIENT_STATE.to_string()),
            ("STORAGE_CONNECTION_STRING", "UseDevelopmentStorage=true".to_string()),
            ("CONTAINER_NAME", "sync".to_string()),
            ("AUTHORITY_HOST", url.clone()),
            ("GRAPH_BASE_URL", format!("{}/v1.0", url)),
        ]);
        for (key, value) in &self.overrides {
            values.insert(*key, value.clone());
        }
        ServiceConfig::from_lookup(|key| values.get(key).cloned()).unwrap()
    }

    pub fn router(&self) -> axum::Router {
        let state = ServiceState::from_config(&self.config())
            .unwrap()
            .with_blob_sink(self.sink.clone());
        service::http_server::router(state)
    }

    pub async fn send(&self, request: Request<Body>) -> (u16, String, Option<String>) {
        let response: Response<Body> = self.router().oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap(), content_type)
    }

    pub async fn mock_token(&mut self, hits: usize) -> Mock {
        self.server
            .mock("POST", format!("/{}/oauth2/v2.0/token", TENANT).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"tok","token_type":"Bearer","expires_in":3599}"#)
            .expect(hits)
            .create_async()
            .await
    }

    pub async fn mock_site(&mut self, drives_body: &str) -> (Mock, Mock) {
        let site = self
            .server
            .mock("GET", "/v1.0/sites/contoso.sharepoint.com:/sites/legal")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"id":"{}"}}"#, SITE_ID))
            .create_async()
            .await;
        let drives = self
            .server
            .mock("GET", format!("/v1.0/sites/{}/drives", SITE_ID).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(drives_body.to_string())
            .create_async()
            .await;
        (site, drives)
    }

    /// Site with a `Documents` drive whose root holds `report.pdf` and a folder.
    pub async fn mock_library(&mut self) -> Vec<Mock> {
        let (site, drives) = self
            .mock_site(&format!(
                r#"{{"value":[{{"id":"b!assets","name":"Site Assets"}},{{"id":"{}","name":"Documents"}}]}}"#,
                DRIVE_ID
            ))
            .await;
        let children = self
            .server
            .mock("GET", format!("/v1.0/drives/{}/root/children", DRIVE_ID).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"value":[
                    {"id":"f1","name":"report.pdf","file":{"mimeType":"application/pdf"}},
                    {"id":"d1","name":"Archive","folder":{"childCount":4}}
                ]}"#,
            )
            .create_async()
            .await;
        let content = self
            .server
            .mock("GET", format!("/v1.0/drives/{}/items/f1/content", DRIVE_ID).as_str())
            .with_status(200)
            .with_body("%PDF-1.7")
            .create_async()
            .await;
        vec![site, drives, children, content]
    }

    /// Mocks that fail their assertion if anything reaches the stub server.
    pub async fn forbid_remote_calls(&mut self) -> Vec<Mock> {
        let mut mocks = Vec::new();
        for method in ["GET", "POST"] {
            mocks.push(
                self.server
                    .mock(method, mockito::Matcher::Any)
                    .expect(0)
                    .create_async()
                    .await,
            );
        }
        mocks
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
