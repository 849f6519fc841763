//! # SQLite Pool
//!
//! Opens the persistent inventory variant.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig                                                               │
//! │    database_path: Some("stockroom.db")      database_path: None         │
//! │          │                                        │                     │
//! │          ▼                                        ▼                     │
//! │    file, created if missing                 "sqlite::memory:"           │
//! │    journal_mode = WAL                       one connection, never       │
//! │    synchronous  = NORMAL                    recycled (a second one      │
//! │    up to max_connections                    would see an empty db)      │
//! │          │                                        │                     │
//! │          └──────────────────┬─────────────────────┘                     │
//! │                             ▼                                           │
//! │           Database { pool }  ──► embedded migrations                    │
//! │                             │                                           │
//! │            products() · categories() · adjustments()                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every connection enables `foreign_keys`; the schema declares none today,
//! so the pragma only matters for future migrations.
//!
//! Transactions that read before they write open with `BEGIN IMMEDIATE`
//! (`begin_write`). A deferred transaction that later
//! upgrades to a write lock fails with `SQLITE_BUSY` under WAL instead of
//! waiting out the busy timeout.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::adjustment::AdjustmentRepository;
use crate::repository::category::CategoryRepository;
use crate::repository::product::ProductRepository;

// =============================================================================
// Configuration
// =============================================================================

/// How to open the SQLite store.
///
/// ```rust,ignore
/// let config = DbConfig::new("./stockroom.db").max_connections(8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// `None` opens a private in-memory database.
    pub database_path: Option<PathBuf>,

    /// Pool ceiling (5 for files, 1 in memory).
    pub max_connections: u32,

    pub min_connections: u32,

    /// Wait for a free connection before `PoolExhausted`-style failure.
    pub connect_timeout: Duration,

    /// `None` keeps idle connections forever.
    pub idle_timeout: Option<Duration>,

    /// Apply embedded migrations inside [`Database::new`].
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a configuration for a database file. The file is created if
    /// it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: Some(path.into()),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Skip migrations when the schema is managed elsewhere.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// A throwaway database that lives as long as the pool.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: None,
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.is_none()
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.database_path {
            None => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
            Some(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                // Readers don't block the writer
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
        };

        Ok(options.foreign_keys(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// SQLite-backed inventory store.
///
/// Implements [`InventoryStore`](crate::store::InventoryStore) by delegating
/// to the repositories (see [`crate::repository`]).
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects and, unless disabled, migrates. Fails with
    /// `ConnectionFailed` or `MigrationFailed`.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        match &config.database_path {
            Some(path) => info!(path = %path.display(), "Initializing database connection"),
            None => info!("Initializing in-memory database"),
        }

        let connect_options = config.connect_options()?;
        debug!(in_memory = config.is_in_memory(), "Connect options built");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout);
        if config.is_in_memory() {
            pool_options = pool_options.max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "SQLite pool open");

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Shorthand for `Database::new(DbConfig::in_memory())`.
    pub async fn in_memory() -> DbResult<Self> {
        Self::new(DbConfig::in_memory()).await
    }

    /// Applies all pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    pub fn adjustments(&self) -> AdjustmentRepository {
        AdjustmentRepository::new(self.pool.clone())
    }

    /// Closes the pool. Later operations fail with `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing SQLite pool");
        self.pool.close().await;
    }

    /// True when the database answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

/// Starts a transaction that holds the write lock from its first statement.
pub(crate) async fn begin_write(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    pool.begin_with("BEGIN IMMEDIATE")
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
