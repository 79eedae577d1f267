use std::sync::Arc;

use badgelink_core::linking::Linker;

use crate::config::ServerConfig;
use crate::sessions::SessionRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Linking service over the configured badge store.
    pub linker: Linker,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live staff scan sessions.
    pub sessions: Arc<SessionRegistry>,
}
