//! # Schema Migrations
//!
//! The SQLite schema lives in `migrations/sqlite/` and is compiled into the
//! binary, so a fresh file needs nothing but the executable.
//!
//! ```text
//! 001_initial_schema.sql
//!   products           id (max+1, no AUTOINCREMENT), CHECK quantity >= 0
//!   categories         name UNIQUE
//!   stock_adjustments  product_id is NOT a foreign key (history may outlive
//!                      the product), index on (product_id, timestamp DESC)
//! ```
//!
//! Applied files are checksummed in `_sqlx_migrations`; change the schema
//! by adding `NNN_description.sql`, not by editing an applied file.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Migrations embedded from `migrations/sqlite` at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;

    let (total, applied) = migration_status(pool).await?;
    info!(total, applied, "Schema up to date");
    Ok(())
}

/// Returns `(embedded_migrations, applied_migrations)`.
async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
