//! Route definitions for staff scan sessions, mounted at `/api/scan-sessions`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scan_sessions;
use crate::state::AppState;

/// ```text
/// POST   /                    -> create_session
/// GET    /{id}                -> get_session
/// DELETE /{id}                -> close_session
/// POST   /{id}/decode         -> decode
/// POST   /{id}/camera-error   -> camera_error
/// POST   /{id}/camera-retry   -> camera_retry
/// POST   /{id}/reset          -> reset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(scan_sessions::create_session))
        .route(
            "/{id}",
            get(scan_sessions::get_session).delete(scan_sessions::close_session),
        )
        .route("/{id}/decode", post(scan_sessions::decode))
        .route("/{id}/camera-error", post(scan_sessions::camera_error))
        .route("/{id}/camera-retry", post(scan_sessions::camera_retry))
        .route("/{id}/reset", post(scan_sessions::reset))
}
