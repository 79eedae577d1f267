//! Shared response envelope types for API handlers.
//!
//! Scan session responses use a `{ "data": ... }` envelope. The staff
//! password check keeps its own `{ ok, message }` shape.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
