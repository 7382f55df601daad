//! HTTP server for wemanage.
//!
//! Carries only what the SPA cannot do itself: the anonymous share view,
//! the waitlist signup, and the health trio. Everything stateful lives in
//! [`wemanage_storage`]; this crate wires it to routes.

pub mod api_error;
mod handlers;
mod response_types;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use wemanage_core::env_parse_with_default;
use wemanage_core::DEFAULT_SESSION_SWEEP_SECS;
use wemanage_mail::Mailer;
use wemanage_storage::{PgStorage, SessionStore};

pub use response_types::{ReadinessResponse, VersionResponse, WaitlistResponse};

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Pooled storage backend.
    pub store: Arc<PgStorage>,
    /// Injected mail capability (real or log-only).
    pub mailer: Arc<Mailer>,
}

/// Spawn the periodic expired-session sweep.
///
/// Interval comes from `WEMANAGE_SESSION_SWEEP_SECS` (default 15 minutes).
/// Errors are logged and the loop continues — the next tick retries.
pub fn start_session_sweep(store: Arc<PgStorage>) {
    let secs = env_parse_with_default("WEMANAGE_SESSION_SWEEP_SECS", DEFAULT_SESSION_SWEEP_SECS);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            match store.delete_expired_sessions().await {
                Ok(0) => tracing::debug!("session sweep: nothing expired"),
                Ok(swept) => tracing::info!(swept, "session sweep: removed expired sessions"),
                Err(err) => tracing::warn!(error = %err, "session sweep failed"),
            }
        }
    });
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/readiness", get(readiness))
        .route("/api/version", get(version))
        .route("/share/{code}", get(handlers::share::get_shared_list))
        .route("/api/waitlist", post(handlers::waitlist::join_waitlist))
        // The share view and waitlist form are consumed cross-origin by the SPA.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn readiness() -> (StatusCode, Json<ReadinessResponse>) {
    (StatusCode::OK, Json(ReadinessResponse { status: "ready", message: None }))
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
