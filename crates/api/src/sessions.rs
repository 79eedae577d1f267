//! Registry of live staff scan sessions.

use std::collections::HashMap;
use std::time::Duration;

use badgelink_core::config::ScanTimings;
use badgelink_core::linking::Linker;
use badgelink_core::scan::{ScanSession, ScanSessionHandle};
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

struct Entry {
    handle: ScanSessionHandle,
    touched_at: Instant,
}

/// Manages all open scan sessions, one per staff device.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Entry>>,
}

impl SessionRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a session and register it under a fresh id.
    pub async fn create(&self, linker: Linker, timings: ScanTimings) -> (Uuid, ScanSessionHandle) {
        let id = Uuid::new_v4();
        let handle = ScanSession::spawn(linker, timings);
        self.sessions.write().await.insert(
            id,
            Entry {
                handle: handle.clone(),
                touched_at: Instant::now(),
            },
        );
        tracing::info!(session_id = %id, "Scan session opened");
        (id, handle)
    }

    /// Look up a session and mark it as recently used.
    pub async fn get(&self, id: Uuid) -> Option<ScanSessionHandle> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.touched_at = Instant::now();
        Some(entry.handle.clone())
    }

    /// Close and forget a session. Returns `false` if the id was unknown.
    pub async fn remove(&self, id: Uuid) -> bool {
        match self.sessions.write().await.remove(&id) {
            Some(entry) => {
                entry.handle.close();
                tracing::info!(session_id = %id, "Scan session closed");
                true
            }
            None => false,
        }
    }

    /// Close every session idle for at least `max_idle`. Returns how many were closed.
    pub async fn sweep_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = entry.touched_at.elapsed() < max_idle && !entry.handle.is_closed();
            if !keep {
                entry.handle.close();
                tracing::debug!(session_id = %id, "Closing idle scan session");
            }
            keep
        });
        before - sessions.len()
    }

    /// Return the current number of open sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Close every session and clear the registry.
    ///
    /// Used during graceful shutdown so no timer outlives the server.
    pub async fn shutdown_all(&self) {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        for entry in sessions.values() {
            entry.handle.close();
        }
        sessions.clear();
        tracing::info!(count, "Closed all scan sessions");
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use badgelink_core::linking::BadgeStore;
    use badgelink_core::memory_store::MemoryBadgeStore;

    use super::*;

    fn linker() -> Linker {
        Linker::new(Arc::new(MemoryBadgeStore::new()) as Arc<dyn BadgeStore>)
    }

    #[tokio::test(start_paused = true)]
    async fn remove_closes_the_session() {
        let registry = SessionRegistry::new();
        let (id, handle) = registry.create(linker(), ScanTimings::default()).await;
        assert_eq!(registry.session_count().await, 1);

        assert!(registry.remove(id).await);
        assert!(handle.is_closed());
        assert!(!registry.remove(id).await);
        assert_matches!(registry.get(id).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_only_closes_idle_sessions() {
        let registry = SessionRegistry::new();
        let (idle, idle_handle) = registry.create(linker(), ScanTimings::default()).await;
        tokio::time::advance(Duration::from_secs(50)).await;
        let (active, _) = registry.create(linker(), ScanTimings::default()).await;
        tokio::time::advance(Duration::from_secs(20)).await;

        assert_eq!(registry.sweep_idle(Duration::from_secs(60)).await, 1);
        assert!(idle_handle.is_closed());
        assert!(registry.get(idle).await.is_none());
        assert!(registry.get(active).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn get_refreshes_idle_clock() {
        let registry = SessionRegistry::new();
        let (id, _) = registry.create(linker(), ScanTimings::default()).await;
        tokio::time::advance(Duration::from_secs(50)).await;
        registry.get(id).await;
        tokio::time::advance(Duration::from_secs(50)).await;

        assert_eq!(registry.sweep_idle(Duration::from_secs(60)).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_all_closes_everything() {
        let registry = SessionRegistry::new();
        let (_, a) = registry.create(linker(), ScanTimings::default()).await;
        let (_, b) = registry.create(linker(), ScanTimings::default()).await;

        registry.shutdown_all().await;
        assert!(a.is_closed() && b.is_closed());
        assert_eq!(registry.session_count().await, 0);
    }
}
