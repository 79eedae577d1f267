use badgelink_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `staff_settings` table.
///
/// `value` is never serialized; the only stored setting is a password.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StaffSetting {
    pub id: DbId,
    pub key: String,
    #[serde(skip_serializing)]
    pub value: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
