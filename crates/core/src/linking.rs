//! Linking service: badge code to ticket URL associations.
//!
//! The service is a thin layer over a [`BadgeStore`]. All write concurrency
//! is delegated to the store's unique-key upsert (last write wins per badge
//! code); nothing here takes a lock.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// Settings key holding the shared staff password.
pub const STAFF_PASSWORD_KEY: &str = "staff_password";

/// A stored badge to ticket association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedBadge {
    pub id: DbId,
    pub badge_code: String,
    pub luma_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backing store rejected or failed the operation.
    #[error("Database error: {0}")]
    Backend(String),

    /// A required settings row is absent.
    #[error("Missing setting: {0}")]
    MissingSetting(&'static str),
}

/// Persistence seam for badge mappings and staff settings.
#[async_trait]
pub trait BadgeStore: Send + Sync {
    /// Insert or replace the mapping for `badge_code`.
    async fn upsert_mapping(
        &self,
        badge_code: &str,
        luma_url: &str,
    ) -> Result<LinkedBadge, StoreError>;

    /// Exact-key lookup of a mapping.
    async fn find_mapping(&self, badge_code: &str) -> Result<Option<LinkedBadge>, StoreError>;

    /// Read a value from the settings table.
    async fn find_setting(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Cheap connectivity probe.
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Shared handle to the linking operations.
#[derive(Clone)]
pub struct Linker {
    store: Arc<dyn BadgeStore>,
}

impl Linker {
    pub fn new(store: Arc<dyn BadgeStore>) -> Self {
        Self { store }
    }

    /// Associate `badge_code` with `ticket_url`, replacing any previous URL.
    ///
    /// Idempotent: repeating the call leaves the same single row.
    pub async fn link(&self, badge_code: &str, ticket_url: &str) -> Result<LinkedBadge, StoreError> {
        let linked = self.store.upsert_mapping(badge_code, ticket_url).await?;
        tracing::info!(
            badge_code = %linked.badge_code,
            mapping_id = linked.id,
            "Badge linked to ticket",
        );
        Ok(linked)
    }

    /// Look up the ticket URL for a badge code.
    pub async fn resolve(&self, badge_code: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .store
            .find_mapping(badge_code)
            .await?
            .map(|m| m.luma_url)
            .filter(|url| !url.is_empty()))
    }

    /// Compare `password` against the stored staff password.
    ///
    /// Plaintext equality with no hashing or rate limiting. This is an
    /// operational gate only and must not be relied on as a security boundary.
    pub async fn verify_password(&self, password: &str) -> Result<bool, StoreError> {
        let stored = self
            .store
            .find_setting(STAFF_PASSWORD_KEY)
            .await?
            .ok_or(StoreError::MissingSetting(STAFF_PASSWORD_KEY))?;
        Ok(stored == password)
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.store.health_check().await
    }
}
