//! Repository for the `badge_mappings` table.

use sqlx::PgPool;

use crate::models::badge_mapping::BadgeMapping;

/// Column list for `badge_mappings` queries.
const COLUMNS: &str = "id, badge_code, luma_url, created_at, updated_at";

/// Provides data access for badge mappings.
pub struct BadgeMappingRepo;

impl BadgeMappingRepo {
    /// Insert or replace the ticket URL for a badge.
    ///
    /// A single statement keyed on the `uq_badge_mappings_badge_code`
    /// constraint, so concurrent writers resolve to last-write-wins.
    pub async fn upsert(
        pool: &PgPool,
        badge_code: &str,
        luma_url: &str,
    ) -> Result<BadgeMapping, sqlx::Error> {
        let query = format!(
            "INSERT INTO badge_mappings (badge_code, luma_url) \
             VALUES ($1, $2) \
             ON CONFLICT (badge_code) DO UPDATE SET \
                 luma_url = EXCLUDED.luma_url \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BadgeMapping>(&query)
            .bind(badge_code)
            .bind(luma_url)
            .fetch_one(pool)
            .await
    }

    /// Find the mapping for an exact badge code.
    pub async fn find_by_badge_code(
        pool: &PgPool,
        badge_code: &str,
    ) -> Result<Option<BadgeMapping>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM badge_mappings WHERE badge_code = $1");
        sqlx::query_as::<_, BadgeMapping>(&query)
            .bind(badge_code)
            .fetch_optional(pool)
            .await
    }

    /// Count rows for a badge code (0 or 1 by constraint).
    pub async fn count_for_badge_code(pool: &PgPool, badge_code: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM badge_mappings WHERE badge_code = $1")
                .bind(badge_code)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
