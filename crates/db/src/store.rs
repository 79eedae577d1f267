//! [`BadgeStore`] adapter over the PostgreSQL repositories.

use async_trait::async_trait;
use badgelink_core::linking::{BadgeStore, LinkedBadge, StoreError};

use crate::repositories::{BadgeMappingRepo, StaffSettingRepo};
use crate::DbPool;

/// Store backed by a sqlx connection pool.
#[derive(Clone)]
pub struct PgBadgeStore {
    pool: DbPool,
}

impl PgBadgeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Store query failed");
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl BadgeStore for PgBadgeStore {
    async fn upsert_mapping(
        &self,
        badge_code: &str,
        luma_url: &str,
    ) -> Result<LinkedBadge, StoreError> {
        BadgeMappingRepo::upsert(&self.pool, badge_code, luma_url)
            .await
            .map(LinkedBadge::from)
            .map_err(backend)
    }

    async fn find_mapping(&self, badge_code: &str) -> Result<Option<LinkedBadge>, StoreError> {
        BadgeMappingRepo::find_by_badge_code(&self.pool, badge_code)
            .await
            .map(|row| row.map(LinkedBadge::from))
            .map_err(backend)
    }

    async fn find_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        StaffSettingRepo::find_by_key(&self.pool, key)
            .await
            .map(|row| row.map(|s| s.value))
            .map_err(backend)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await.map_err(backend)
    }
}
