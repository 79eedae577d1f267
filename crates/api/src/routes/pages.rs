use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Static pages mounted at the root.
///
/// ```text
/// GET /          -> index
/// GET /unlinked  -> unlinked
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/unlinked", get(pages::unlinked))
}
