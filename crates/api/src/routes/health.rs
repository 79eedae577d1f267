//! Liveness probe for load balancers and the event-day checklist.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the badge store cannot be reached.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Staff scan sessions currently held in memory.
    pub open_sessions: usize,
}

/// GET /health
///
/// Always 200; a store outage only changes the body.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = state.linker.health_check().await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        open_sessions: state.sessions.session_count().await,
    })
}

/// Mounted at the root, next to `/badge/{id}`, outside `/api`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
