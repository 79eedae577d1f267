//! Periodic cleanup of abandoned scan sessions.
//!
//! A staff device that closes its tab never sends `DELETE`, so sessions
//! untouched for longer than the idle timeout are closed here, which also
//! cancels any timers they still hold.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::sessions::SessionRegistry;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Run the idle session sweep loop until `cancel` is triggered.
pub async fn run(registry: Arc<SessionRegistry>, idle_timeout: Duration, cancel: CancellationToken) {
    tracing::info!(
        idle_timeout_secs = idle_timeout.as_secs(),
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Scan session sweeper started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Scan session sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                let closed = registry.sweep_idle(idle_timeout).await;
                if closed > 0 {
                    tracing::info!(closed, "Closed idle scan sessions");
                } else {
                    tracing::debug!("No idle scan sessions");
                }
            }
        }
    }
}
