//! # Connection Pool
//!
//! Opens the SQLite file, tunes the connection, and hands out repositories.
//!
//! ## Concurrency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      One pool, many requests                            │
//! │                                                                         │
//! │  DbConfig::new("kasir.db").busy_timeout(5s).report_offset(+07:00)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config) ── WAL, foreign_keys, migrations                │
//! │       │                                                                 │
//! │       ├── POST /api/checkout ─► conn A: BEGIN, UPDATE (write lock) ... │
//! │       ├── POST /api/checkout ─► conn B: BEGIN, UPDATE ... waits        │
//! │       │                          (at most busy_timeout, then BUSY)      │
//! │       └── GET /api/report    ─► conn C: BEGIN, SELECT (WAL snapshot,   │
//! │                                  never waits on writers)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! SQLite allows one writer at a time. Checkouts therefore serialize on the
//! database lock rather than on anything held in process.

use chrono::{FixedOffset, Local};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::category::CategoryRepository;
use crate::repository::product::ProductRepository;
use crate::repository::transaction::TransactionRepository;

const MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Storage settings.
///
/// ```rust,ignore
/// let config = DbConfig::new("kasir.db")
///     .max_connections(8)
///     .busy_timeout(Duration::from_secs(5))
///     .report_offset(FixedOffset::east_opt(7 * 3600).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub path: PathBuf,

    pub max_connections: u32,

    /// Connections kept open while idle. An in-memory database lives only as
    /// long as its last connection.
    pub min_connections: u32,

    /// How long a request waits for a free pooled connection.
    pub acquire_timeout: Duration,

    pub idle_timeout: Duration,

    /// How long a statement waits on another connection's lock before
    /// failing with `SQLITE_BUSY`.
    pub busy_timeout: Duration,

    /// Apply embedded migrations on open.
    pub migrate: bool,

    /// Offset whose calendar day bounds the daily report.
    pub report_offset: FixedOffset,
}

impl DbConfig {
    /// Defaults: 5 connections, 5 s busy timeout, migrations on, host's
    /// current UTC offset for reports.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: path.into(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            busy_timeout: Duration::from_secs(5),
            migrate: true,
            report_offset: *Local::now().offset(),
        }
    }

    /// Fresh, private, migrated database for tests.
    pub fn in_memory() -> Self {
        DbConfig {
            // every connection to :memory: would be a separate database
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            ..DbConfig::new(MEMORY)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn report_offset(mut self, offset: FixedOffset) -> Self {
        self.report_offset = offset;
        self
    }

    fn is_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let base = if self.is_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new().filename(&self.path)
        };

        let options = base
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // off by default in SQLite; ON DELETE CASCADE / SET NULL need it
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout);

        Ok(options)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Pool handle and repository factory. Clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    report_offset: FixedOffset,
}

impl Database {
    /// Opens (creating if needed) the database and applies migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.path.display(), "Opening database");

        let options = config.connect_options()?;
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(
            max_connections = config.max_connections,
            busy_timeout_ms = config.busy_timeout.as_millis() as u64,
            report_offset = %config.report_offset,
            "Pool ready"
        );

        let db = Database {
            pool,
            report_offset: config.report_offset,
        };

        if config.migrate {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Safe to call repeatedly.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool, for diagnostics and tests.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    /// Checkout engine and daily reports.
    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone(), self.report_offset)
    }

    /// `SELECT 1` probe.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Waits for checked-out connections to return, then closes the pool.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);

        // Second run is a no-op.
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kasir.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert!(db.health_check().await);
        assert!(path.exists());

        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_builder() {
        let wib = FixedOffset::east_opt(7 * 3600).unwrap();
        let config = DbConfig::new("/tmp/kasir.db")
            .max_connections(10)
            .busy_timeout(Duration::from_millis(250))
            .report_offset(wib);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert_eq!(config.report_offset, wib);
        assert!(config.migrate);
        assert!(!config.is_memory());

        let memory = DbConfig::in_memory();
        assert!(memory.is_memory());
        assert_eq!(memory.max_connections, 1);
    }
}
