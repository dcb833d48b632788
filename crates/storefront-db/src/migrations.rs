//! # Embedded Migrations
//!
//! The schema lives in `migrations/sqlite/` at the workspace root and is
//! compiled into the binary by `sqlx::migrate!`.
//!
//! ```text
//! 001_initial_schema.sql
//!   users ─┐
//!          │ (id only, no FK: carts and orders may precede the user row)
//!   categories ◄── products ◄── cart
//!                      ▲
//!   orders ◄── order_items
//! ```
//!
//! Applied files are recorded in `_sqlx_migrations`. Edit the schema by adding
//! `NNN_description.sql`; an applied file must never change.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every migration not yet recorded, in filename order.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!(embedded = MIGRATOR.migrations.len(), "Applying pending migrations");

    MIGRATOR.run(pool).await?;

    info!("Schema up to date");
    Ok(())
}

/// `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
