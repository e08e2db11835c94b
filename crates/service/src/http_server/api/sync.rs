use std::collections::HashMap;

use axum::extract::{Json, Query, State};
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

use crate::sync_ops::{sync_files, SyncError};
use crate::ServiceState;

use super::auth;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SyncResponse {
    Success { files_synced: Vec<String> },
    Error { message: String },
}

pub async fn handler(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, SyncRouteError> {
    if !auth::authorize(state.config().sync_api_key.as_deref(), &headers, &params) {
        return Err(SyncRouteError::Unauthorized);
    }

    tracing::info!("Manual Sync triggered.");
    let report = sync_files(&state).await?;

    Ok((
        StatusCode::OK,
        Json(SyncResponse::Success {
            files_synced: report.files_synced,
        }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum SyncRouteError {
    #[error("missing or invalid function key")]
    Unauthorized,
    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl IntoResponse for SyncRouteError {
    fn into_response(self) -> Response {
        match self {
            SyncRouteError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "unauthorized").into_response()
            }
            SyncRouteError::Sync(e) => {
                tracing::error!("Sync failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(SyncResponse::Error {
                        message: e.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
