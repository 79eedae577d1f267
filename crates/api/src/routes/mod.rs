pub mod badge;
pub mod health;
pub mod pages;
pub mod scan_sessions;
pub mod staff;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /verify-staff                          staff password check (POST)
///
/// /scan-sessions                         open session (POST)
/// /scan-sessions/{id}                    snapshot (GET), close (DELETE)
/// /scan-sessions/{id}/decode             camera decode result (POST)
/// /scan-sessions/{id}/camera-error       camera failure overlay (POST)
/// /scan-sessions/{id}/camera-retry       reinitialize capture (POST)
/// /scan-sessions/{id}/reset              full reset (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(staff::router())
        .nest("/scan-sessions", scan_sessions::router())
}
