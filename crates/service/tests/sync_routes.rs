mod support;

use axum::body::Body;
use axum::http::Request;
use serde_json::{json, Value};

use support::*;

#[tokio::test]
async fn health_is_constant() -> anyhow::Result<()> {
    let harness = Harness::new().await;
    let (status, body, _) = harness.send(get("/api/health")).await;
    assert_eq!(status, 200);
    assert_eq!(body, "Healthy");
    Ok(())
}

#[tokio::test]
async fn unknown_paths_are_not_found() -> anyhow::Result<()> {
    let harness = Harness::new().await;
    let (status, body, _) = harness.send(get("/api/nope")).await;
    assert_eq!(status, 404);
    assert_eq!(body, "not found");
    Ok(())
}

#[tokio::test]
async fn sync_reports_uploaded_files() -> anyhow::Result<()> {
    let mut harness = Harness::new().await;
    let _token = harness.mock_token(1).await;
    let _library = harness.mock_library().await;

    let (status, body, content_type) = harness.send(get("/api/sync")).await;

    assert_eq!(status, 200);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_str(&body)?;
    assert_eq!(body, json!({"status": "success", "files_synced": ["report.pdf"]}));
    assert_eq!(harness.sink.names(), vec!["report.pdf".to_string()]);
    Ok(())
}

#[tokio::test]
async fn sync_falls_back_to_first_drive() -> anyhow::Result<()> {
    let mut harness = Harness::new().await;
    harness.set("LIST_NAME", "Contracts");
    let _token = harness.mock_token(1).await;
    let _drives = harness
        .mock_site(r#"{"value":[{"id":"b!first","name":"Shared"},{"id":"b!second","name":"Other"}]}"#)
        .await;
    let children = harness
        .server
        .mock("GET", "/v1.0/drives/b!first/root/children")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"value":[]}"#)
        .expect(1)
        .create_async()
        .await;

    let (status, body, _) = harness.send(get("/api/sync")).await;

    assert_eq!(status, 200);
    let body: Value = serde_json::from_str(&body)?;
    assert_eq!(body, json!({"status": "success", "files_synced": []}));
    children.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn sync_with_no_drives_is_an_error() -> anyhow::Result<()> {
    let mut harness = Harness::new().await;
    let _token = harness.mock_token(1).await;
    let _drives = harness.mock_site(r#"{"value":[]}"#).await;

    let (status, body, _) = harness.send(post_json("/api/sync", "")).await;

    assert_eq!(status, 500);
    let body: Value = serde_json::from_str(&body)?;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "document library 'Documents' not found");
    assert!(harness.sink.names().is_empty());
    Ok(())
}

#[tokio::test]
async fn sync_surfaces_token_errors() -> anyhow::Result<()> {
    let mut harness = Harness::new().await;
    let _token = harness
        .server
        .mock("POST", "/tenant-1/oauth2/v2.0/token")
        .with_status(401)
        .with_body(r#"{"error":"invalid_client"}"#)
        .create_async()
        .await;

    let (status, body, _) = harness.send(get("/api/sync")).await;

    assert_eq!(status, 500);
    let body: Value = serde_json::from_str(&body)?;
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("invalid_client"));
    Ok(())
}

#[tokio::test]
async fn sync_key_is_enforced_when_configured() -> anyhow::Result<()> {
    let mut harness = Harness::new().await;
    harness.set("SYNC_API_KEY", "fn-key");
    let _token = harness.mock_token(2).await;
    let _library = harness.mock_library().await;

    let (status, _, _) = harness.send(get("/api/sync")).await;
    assert_eq!(status, 401);

    let (status, _, _) = harness.send(get("/api/sync?code=wrong")).await;
    assert_eq!(status, 401);

    let (status, _, _) = harness.send(get("/api/sync?code=fn-key")).await;
    assert_eq!(status, 200);

    let request = Request::builder()
        .method("POST")
        .uri("/api/sync")
        .header("x-functions-key", "fn-key")
        .body(Body::empty())?;
    let (status, _, _) = harness.send(request).await;
    assert_eq!(status, 200);
    Ok(())
}
