//! Database pool and schema migrations

use std::time::Duration;

use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};

use crate::config::DatabaseConfig;

/// Versioned migrations embedded from `backend/migrations`
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create the connection pool
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await
}

/// Apply all pending migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Versions recorded as successfully applied, newest first
async fn applied_versions(pool: &PgPool) -> Result<Vec<i64>, sqlx::Error> {
    let table_exists =
        sqlx::query_scalar::<_, bool>("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await?;

    if !table_exists {
        return Ok(Vec::new());
    }

    sqlx::query_scalar::<_, i64>(
        "SELECT version FROM _sqlx_migrations WHERE success ORDER BY version DESC",
    )
    .fetch_all(pool)
    .await
}

/// Revert the most recently applied migration, returning its version
pub async fn revert_last_migration(pool: &PgPool) -> anyhow::Result<Option<i64>> {
    let applied = applied_versions(pool).await?;

    let Some(&latest) = applied.first() else {
        return Ok(None);
    };
    // undo() reverts everything newer than the target
    let target = applied.get(1).copied().unwrap_or(0);

    MIGRATOR.undo(pool, target).await?;
    Ok(Some(latest))
}

/// Applied state of a single migration
#[derive(Debug)]
pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    pub applied: bool,
}

/// List every known migration with its applied state
pub async fn migration_status(pool: &PgPool) -> anyhow::Result<Vec<MigrationStatus>> {
    let applied = applied_versions(pool).await?;

    Ok(MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .map(|m| MigrationStatus {
            version: m.version,
            description: m.description.to_string(),
            applied: applied.contains(&m.version),
        })
        .collect())
}
