//! Staff password check.
//!
//! Plaintext comparison against the single stored shared secret with no
//! hashing or rate limiting. Treat it as an operational gate, not a
//! security boundary.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct VerifyStaffResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl VerifyStaffResponse {
    fn failure(status: StatusCode, message: &'static str) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                ok: false,
                message: Some(message),
            }),
        )
    }
}

/// POST /api/verify-staff
///
/// Body `{ "password": "..." }`. Returns `{ ok: true }` on match, otherwise
/// `{ ok: false, message }` with 400, 401 or 500.
pub async fn verify_staff(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<VerifyStaffResponse>) {
    let password = payload.ok().and_then(|Json(body)| {
        body.get("password")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
    });

    let Some(password) = password else {
        return VerifyStaffResponse::failure(StatusCode::BAD_REQUEST, "Password required");
    };

    match state.linker.verify_password(&password).await {
        Ok(true) => (
            StatusCode::OK,
            Json(VerifyStaffResponse {
                ok: true,
                message: None,
            }),
        ),
        Ok(false) => {
            tracing::info!("Staff password rejected");
            VerifyStaffResponse::failure(StatusCode::UNAUTHORIZED, "Incorrect password")
        }
        Err(e) => {
            tracing::error!(error = %e, "Staff password lookup failed");
            VerifyStaffResponse::failure(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
        }
    }
}
