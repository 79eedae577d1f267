//! Route for the badge QR redirect.

use axum::routing::get;
use axum::Router;

use crate::handlers::badge;
use crate::state::AppState;

/// Root-level badge routes.
///
/// ```text
/// GET /badge/{id} -> redirect_badge
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/badge/{id}", get(badge::redirect_badge))
}
