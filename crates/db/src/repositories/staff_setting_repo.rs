//! Repository for the `staff_settings` table.

use sqlx::PgPool;

use crate::models::staff_setting::StaffSetting;

const COLUMNS: &str = "id, key, value, created_at, updated_at";

/// Provides data access for staff settings.
pub struct StaffSettingRepo;

impl StaffSettingRepo {
    /// Find a setting by key.
    pub async fn find_by_key(
        pool: &PgPool,
        key: &str,
    ) -> Result<Option<StaffSetting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff_settings WHERE key = $1");
        sqlx::query_as::<_, StaffSetting>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace a setting. The service never calls this; it exists
    /// for provisioning and tests.
    pub async fn upsert(
        pool: &PgPool,
        key: &str,
        value: &str,
    ) -> Result<StaffSetting, sqlx::Error> {
        let query = format!(
            "INSERT INTO staff_settings (key, value) \
             VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StaffSetting>(&query)
            .bind(key)
            .bind(value)
            .fetch_one(pool)
            .await
    }
}
