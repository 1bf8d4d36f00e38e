//! Axum router for the webhook server.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Path Telegram delivers updates to, relative to the public URL.
pub const WEBHOOK_PATH: &str = "/telegram/webhook";

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(handlers::telegram_webhook))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
