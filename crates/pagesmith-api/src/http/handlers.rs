//! Webhook and health handlers.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use pagesmith_infra::telegram::types::Update;
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::state::AppState;

/// Header Telegram echoes the secret registered with `setWebhook` in.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// POST /telegram/webhook
///
/// Acknowledges immediately and handles the update on its own task, since a
/// publish run outlasts Telegram's delivery timeout.
pub async fn telegram_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> StatusCode {
    if let Some(secret) = &state.webhook_secret {
        let provided = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if provided != Some(secret.expose_secret()) {
            warn!(update_id = update.update_id, "rejecting webhook call with bad secret");
            return StatusCode::UNAUTHORIZED;
        }
    }

    debug!(update_id = update.update_id, "accepted webhook update");
    tokio::spawn(async move { state.dispatch(update).await });
    StatusCode::OK
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
