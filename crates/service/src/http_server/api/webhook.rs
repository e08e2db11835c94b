use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::{header, Method, StatusCode};

use common::prelude::NotificationBatch;

use crate::sync_ops::{process_notifications, SyncError};
use crate::ServiceState;

/// Graph sends the handshake token under either spelling.
const VALIDATION_TOKEN_PARAMS: [&str; 2] = ["validationToken", "validationtoken"];

pub async fn handler(
    State(state): State<ServiceState>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response, WebhookError> {
    tracing::info!("Change notification webhook triggered.");

    let validation_token = VALIDATION_TOKEN_PARAMS
        .iter()
        .find_map(|name| params.get(*name))
        .filter(|token| !token.is_empty());
    if let Some(token) = validation_token {
        tracing::info!("Validation handshake successful: {}", token);
        return Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain")],
            token.clone(),
        )
            .into_response());
    }

    if method == Method::GET {
        return Ok((StatusCode::OK, "Handshake listener active").into_response());
    }

    let batch: NotificationBatch = serde_json::from_slice(&body)?;
    tracing::info!(count = batch.value.len(), "Notification received");

    let outcome = process_notifications(&state, &batch).await?;
    tracing::info!(
        runs = outcome.runs.len(),
        skipped = outcome.skipped,
        "notifications processed"
    );

    Ok((StatusCode::ACCEPTED, "Accepted").into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("invalid notification payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("sync failed: {0}")]
    Sync(#[from] SyncError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        tracing::error!("Error processing webhook: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Error").into_response()
    }
}
