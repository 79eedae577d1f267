//! In-process [`BadgeStore`] used by tests and local runs without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::linking::{BadgeStore, LinkedBadge, StoreError, STAFF_PASSWORD_KEY};
use crate::types::DbId;

#[derive(Default)]
struct Tables {
    mappings: HashMap<String, LinkedBadge>,
    settings: HashMap<String, String>,
    next_id: DbId,
}

/// Map-backed store with the same upsert semantics as the SQL adapter.
///
/// A failure can be injected with [`MemoryBadgeStore::fail_with`]; every
/// operation then returns [`StoreError::Backend`] until it is cleared.
#[derive(Default)]
pub struct MemoryBadgeStore {
    tables: RwLock<Tables>,
    failure: Mutex<Option<String>>,
}

impl MemoryBadgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the `staff_password` setting.
    pub fn with_staff_password(mut self, password: &str) -> Self {
        self.tables
            .get_mut()
            .settings
            .insert(STAFF_PASSWORD_KEY.to_string(), password.to_string());
        self
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.to_string());
    }

    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Number of stored mappings.
    pub async fn len(&self) -> usize {
        self.tables.read().await.mappings.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        match self.failure.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            Some(msg) => Err(StoreError::Backend(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BadgeStore for MemoryBadgeStore {
    async fn upsert_mapping(
        &self,
        badge_code: &str,
        luma_url: &str,
    ) -> Result<LinkedBadge, StoreError> {
        self.check_failure()?;
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        if let Some(existing) = tables.mappings.get_mut(badge_code) {
            existing.luma_url = luma_url.to_string();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        tables.next_id += 1;
        let row = LinkedBadge {
            id: tables.next_id,
            badge_code: badge_code.to_string(),
            luma_url: luma_url.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.mappings.insert(badge_code.to_string(), row.clone());
        Ok(row)
    }

    async fn find_mapping(&self, badge_code: &str) -> Result<Option<LinkedBadge>, StoreError> {
        self.check_failure()?;
        Ok(self.tables.read().await.mappings.get(badge_code).cloned())
    }

    async fn find_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_failure()?;
        Ok(self.tables.read().await.settings.get(key).cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check_failure()
    }
}
