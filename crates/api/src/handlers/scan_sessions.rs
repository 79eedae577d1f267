//! Handlers for staff scan sessions.
//!
//! The browser owns the camera; it forwards each decode result, camera
//! failure and button press here and renders the returned snapshot. The
//! `capture_generation` field changes whenever the camera must be torn down
//! and reopened.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use badgelink_core::error::CoreError;
use badgelink_core::scan::{CommandReply, ScanSessionHandle, ScanSnapshot, SessionClosed};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Session state as returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    #[serde(flatten)]
    pub snapshot: ScanSnapshot,
}

/// Session state after a submitted event.
#[derive(Debug, Serialize)]
pub struct CommandView {
    pub id: Uuid,
    /// Whether the session acted on the event.
    pub accepted: bool,
    #[serde(flatten)]
    pub snapshot: ScanSnapshot,
}

impl CommandView {
    fn new(id: Uuid, reply: CommandReply) -> Self {
        Self {
            id,
            accepted: reply.handled,
            snapshot: reply.snapshot,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DecodeRequest {
    pub raw_value: String,
}

#[derive(Debug, Deserialize)]
pub struct CameraErrorRequest {
    #[serde(default)]
    pub message: Option<String>,
}

fn not_found(id: Uuid) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ScanSession",
        id: id.to_string(),
    })
}

async fn find(state: &AppState, id: Uuid) -> AppResult<ScanSessionHandle> {
    state.sessions.get(id).await.ok_or_else(|| not_found(id))
}

fn reply(id: Uuid, result: Result<CommandReply, SessionClosed>) -> AppResult<Json<DataResponse<CommandView>>> {
    let reply = result.map_err(|_| not_found(id))?;
    Ok(Json(DataResponse {
        data: CommandView::new(id, reply),
    }))
}

/// POST /api/scan-sessions
///
/// Open a new session in `scan_badge`.
pub async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let (id, handle) = state
        .sessions
        .create(state.linker.clone(), state.config.scan_timings)
        .await;

    (
        StatusCode::CREATED,
        Json(DataResponse {
            data: SessionView {
                id,
                snapshot: handle.snapshot(),
            },
        }),
    )
}

/// GET /api/scan-sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<SessionView>>> {
    let handle = find(&state, id).await?;
    Ok(Json(DataResponse {
        data: SessionView {
            id,
            snapshot: handle.snapshot(),
        },
    }))
}

/// POST /api/scan-sessions/{id}/decode
///
/// Forward one camera decode result. A body without a string `raw_value`
/// is a 400; an empty string reaches the session and is ignored there.
pub async fn decode(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<DecodeRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<CommandView>>> {
    let handle = find(&state, id).await?;
    let Json(input) = payload?;
    reply(id, handle.decode(input.raw_value).await)
}

/// POST /api/scan-sessions/{id}/camera-error
///
/// The body is optional; without a `message` the overlay shows the default
/// camera error.
pub async fn camera_error(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Option<Json<CameraErrorRequest>>, JsonRejection>,
) -> AppResult<Json<DataResponse<CommandView>>> {
    let handle = find(&state, id).await?;
    let message = payload?.and_then(|Json(body)| body.message);
    reply(id, handle.camera_failed(message).await)
}

/// POST /api/scan-sessions/{id}/camera-retry
pub async fn camera_retry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<CommandView>>> {
    let handle = find(&state, id).await?;
    reply(id, handle.retry_camera().await)
}

/// POST /api/scan-sessions/{id}/reset
///
/// "Try Again" / "Reset & Start Over".
pub async fn reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<CommandView>>> {
    let handle = find(&state, id).await?;
    reply(id, handle.reset().await)
}

/// DELETE /api/scan-sessions/{id}
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
