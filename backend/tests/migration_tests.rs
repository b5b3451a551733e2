//! Schema migration tests
//!
//! These start from an empty database and walk the embedded migrations
//! forward, all the way back, and forward again.

use sqlx::PgPool;

use getvolunteer_backend::db::{self, MIGRATOR};

fn up_migration_versions() -> Vec<i64> {
    MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .map(|m| m.version)
        .collect()
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_status_before_any_migration(pool: PgPool) {
    let status = db::migration_status(&pool).await.unwrap();

    assert_eq!(status.len(), up_migration_versions().len());
    assert!(status.iter().all(|m| !m.applied));
    assert_eq!(db::revert_last_migration(&pool).await.unwrap(), None);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_migrations_revert_and_reapply(pool: PgPool) {
    let versions = up_migration_versions();

    db::run_migrations(&pool).await.unwrap();
    let status = db::migration_status(&pool).await.unwrap();
    assert!(status.iter().all(|m| m.applied));

    // Reverts come back newest first, one per call
    let mut reverted = Vec::new();
    while let Some(version) = db::revert_last_migration(&pool).await.unwrap() {
        reverted.push(version);
    }
    let mut newest_first = versions.clone();
    newest_first.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(reverted, newest_first);

    let status = db::migration_status(&pool).await.unwrap();
    assert!(status.iter().all(|m| !m.applied));

    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM information_schema.tables \
         WHERE table_name IN ('volunteers', 'needs', 'volunteer_need_matches')",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(tables, 0);

    db::run_migrations(&pool).await.unwrap();
    let applied = db::migration_status(&pool)
        .await
        .unwrap()
        .into_iter()
        .filter(|m| m.applied)
        .count();
    assert_eq!(applied, versions.len());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_revert_drops_match_pair_constraint(pool: PgPool) {
    db::run_migrations(&pool).await.unwrap();

    let constraint_exists = || async {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM pg_constraint WHERE conname = 'uq_volunteer_need_matches_pair')",
        )
        .fetch_one(&pool)
        .await
        .unwrap()
    };

    assert!(constraint_exists().await);
    db::revert_last_migration(&pool).await.unwrap();
    assert!(!constraint_exists().await);
}
