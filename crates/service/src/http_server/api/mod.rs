use axum::routing::get;
use axum::Router;

mod auth;
pub mod sync;
pub mod webhook;

pub use sync::SyncResponse;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/webhook", get(webhook::handler).post(webhook::handler))
        .route("/sync", get(sync::handler).post(sync::handler))
        .route("/health", get(super::health::handler))
        .with_state(state)
}
