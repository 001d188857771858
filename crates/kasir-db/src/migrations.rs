//! Schema migrations, compiled into the binary from `migrations/sqlite/`.
//!
//! Files apply in name order (`001_initial_schema.sql`, then `002_...`).
//! An applied file is never edited; schema changes go in a new file.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Brings the schema up to date. Already-applied files are skipped.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let (known, applied) = migration_status(pool).await.unwrap_or((MIGRATOR.migrations.len(), 0));
    debug!(known, applied, "Schema status before migrate");

    MIGRATOR.run(pool).await?;

    if applied < known {
        info!(pending = known - applied, "Schema migrated");
    }
    Ok(())
}

/// `(embedded, applied)` migration counts.
///
/// Fails on a fresh database, where the bookkeeping table does not exist yet.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?;

    Ok((MIGRATOR.migrations.len(), applied as usize))
}
