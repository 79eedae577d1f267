//! Handler for the redirect embedded in every printed badge QR code.

use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Where unresolved badges are sent.
pub const UNLINKED_PATH: &str = "/unlinked";

/// GET /badge/{id}
///
/// Redirects (307) to the ticket URL linked to the badge. Any miss or
/// failure redirects to the "badge not linked" page instead of an error.
pub async fn redirect_badge(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let target = match state.linker.resolve(&id).await {
        Ok(Some(url)) => HeaderValue::from_str(&url).ok().or_else(|| {
            tracing::warn!(badge_code = %id, "Stored ticket URL is not a valid Location header");
            None
        }),
        Ok(None) => {
            tracing::debug!(badge_code = %id, "Badge not linked");
            None
        }
        Err(e) => {
            tracing::error!(badge_code = %id, error = %e, "Badge lookup failed");
            None
        }
    };

    let location = target.unwrap_or_else(|| HeaderValue::from_static(UNLINKED_PATH));
    (StatusCode::TEMPORARY_REDIRECT, [(LOCATION, location)]).into_response()
}
