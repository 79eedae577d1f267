//! Badge mapping rows: one per physical badge.

use badgelink_core::linking::LinkedBadge;
use badgelink_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `badge_mappings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BadgeMapping {
    pub id: DbId,
    pub badge_code: String,
    pub luma_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<BadgeMapping> for LinkedBadge {
    fn from(row: BadgeMapping) -> Self {
        LinkedBadge {
            id: row.id,
            badge_code: row.badge_code,
            luma_url: row.luma_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
