//! HTTP front end: receives webhook deliveries, runs them through the
//! translator, and forwards the result to the notification bus.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State as AxumState,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing,
};
use serde_json::json;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::SharedState;
use crate::Stats;
use crate::payload;
use crate::translate::{Outcome, translate};

/// Builds the service router. Shared with the integration tests.
pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/", routing::get(root))
        .route("/webhook", routing::post(handle_webhook))
        .route("/status", routing::get(status))
        .with_state(state)
}

pub async fn root() -> &'static str {
    "github_notify"
}

/// Returns the current server status with delivery counters
pub async fn status(AxumState(state): AxumState<SharedState>) -> impl IntoResponse {
    use std::sync::atomic::Ordering::Relaxed;

    Json(json!({
        "server": {
            "name": "github_notify",
            "version": env!("CARGO_PKG_VERSION"),
            "started_at": state.started_at,
            "uptime_seconds": state.start_time.elapsed().as_secs(),
        },
        "deliveries": {
            "received": state.stats.received.load(Relaxed),
            "published": state.stats.published.load(Relaxed),
            "suppressed": state.stats.suppressed.load(Relaxed),
            "ignored": state.stats.ignored.load(Relaxed),
            "failed": state.stats.failed.load(Relaxed),
        },
        "config": {
            "level": state.config.level,
            "ignored_users": state.config.ignore.len(),
        }
    }))
}

/// Handles the GitHub webhook POST request.
pub async fn handle_webhook(
    AxumState(state): AxumState<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    Stats::bump(&state.stats.received);

    // GitHub sends a delivery id with every hook; generate one for manual
    // or replayed requests so every log line stays correlatable.
    let delivery = headers
        .get("X-GitHub-Delivery")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::now_v7().to_string());

    let event_opt = headers.get("X-GitHub-Event").and_then(|v| v.to_str().ok());
    let Some(event) = event_opt else {
        warn!("Delivery {}: GitHub event name not found", delivery);
        return StatusCode::NO_CONTENT;
    };
    info!("Delivery {}: received '{}' event", delivery, event);

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            info!("Delivery {}: could not parse JSON body: {:?}", delivery, e);
            return StatusCode::BAD_REQUEST;
        }
    };
    debug!("{:#?}", &payload);

    // Ignore-list check comes before translation so a misshapen payload
    // from an ignored sender never surfaces as an error.
    if let Ok(login) = payload::string_at(&payload, &["sender", "login"]) {
        if state.config.is_ignored(login) {
            info!("Delivery {}: ignoring notification from {}", delivery, login);
            Stats::bump(&state.stats.ignored);
            return StatusCode::NO_CONTENT;
        }
    }

    let mut notification = match translate(event, &payload) {
        Ok(Outcome::Notify(n)) => n,
        Ok(Outcome::Suppressed) => {
            info!("Delivery {}: skipping notification", delivery);
            Stats::bump(&state.stats.suppressed);
            return StatusCode::NO_CONTENT;
        }
        Err(e) => {
            warn!(
                "Delivery {}: unable to translate '{}' event: {}",
                delivery, event, e
            );
            Stats::bump(&state.stats.failed);
            return StatusCode::BAD_REQUEST;
        }
    };

    notification.level = state.config.level;

    info!(
        "Delivery {}: sending notification: {}",
        delivery, notification.message
    );
    match state.publisher.publish(&notification) {
        Ok(()) => {
            Stats::bump(&state.stats.published);
            StatusCode::OK
        }
        Err(e) => {
            error!("Delivery {}: failed to publish notification: {}", delivery, e);
            Stats::bump(&state.stats.failed);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
