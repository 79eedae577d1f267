//! PostgreSQL persistence for badge mappings and staff settings.

use std::str::FromStr;

use badgelink_core::config::StoreConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod models;
pub mod repositories;
pub mod store;

pub use store::PgBadgeStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool for the hosted store.
///
/// The access key is applied as the connection password, overriding any
/// password embedded in the URL.
pub async fn create_pool(config: &StoreConfig) -> Result<DbPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(&config.url)?.password(&config.access_key);
    PgPoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
}

/// Round-trip a trivial query to confirm the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
