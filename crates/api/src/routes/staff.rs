use axum::routing::post;
use axum::Router;

use crate::handlers::staff;
use crate::state::AppState;

/// ```text
/// POST /verify-staff -> verify_staff
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/verify-staff", post(staff::verify_staff))
}
