//! # Pool & Database Handle
//!
//! Opens the SQLite pool every repository and the checkout sequence share.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ApiConfig::db_config()  ──►  DbConfig { path, pool sizes, timeouts }  │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │  Database::new ── connect_options ── SqlitePool ── MIGRATOR.run         │
//! │                                   │                                     │
//! │            ┌──────────────┬───────┴──────┬──────────────┐               │
//! │            ▼              ▼              ▼              ▼               │
//! │      products()      cart()         orders()      checkout()           │
//! │      categories()    users()                      (holds one           │
//! │                                                    connection for the   │
//! │                                                    whole transaction)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! File databases run in WAL mode so catalog reads keep flowing while a
//! checkout writes. `:memory:` databases exist only as long as their single
//! connection and back the test suites.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::checkout::{self, CheckoutError, CheckoutOptions, CheckoutReceipt};
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::cart::CartRepository;
use crate::repository::category::CategoryRepository;
use crate::repository::order::OrderRepository;
use crate::repository::product::ProductRepository;
use crate::repository::user::UserRepository;
use storefront_core::checkout::CheckoutRequest;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/storefront/storefront.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub database_path: PathBuf,

    /// Pool ceiling (default 5, `DB_MAX_CONNECTIONS`).
    pub max_connections: u32,

    /// Connections opened eagerly (default 1).
    pub min_connections: u32,

    /// How long a handler waits for a free connection (default 30s).
    pub connect_timeout: Duration,

    /// Idle connections are closed after this (default 10 min, `None` never).
    pub idle_timeout: Option<Duration>,

    /// Connections are recycled after this (default 30 min, `None` never).
    pub max_lifetime: Option<Duration>,

    /// Apply embedded migrations in `Database::new` (default true).
    pub run_migrations: bool,
}

impl DbConfig {
    /// Defaults for a file database. The file is created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Turn off for tooling that inspects a database without changing it.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// True for the `:memory:` path used by tests.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }

    /// Private database for one test.
    ///
    /// The database lives as long as its only connection, so that
    /// connection is never reaped. Code holding a transaction must not touch
    /// the pool until the transaction ends.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            max_lifetime: None,
            run_migrations: true,
        }
    }
}

fn connect_options(config: &DbConfig) -> DbResult<SqliteConnectOptions> {
    let options = if config.is_in_memory() {
        SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Memory)
    } else {
        SqliteConnectOptions::new()
            .filename(&config.database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
    };

    debug!("Connection options configured");
    Ok(options.foreign_keys(true))
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cheap to clone: every clone shares the same pool, so one `Database` lives
/// in the HTTP server state and each handler borrows what it needs.
///
/// ## Usage in Handlers
/// ```rust,ignore
/// async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<ProductListing>>> {
///     let products = state.db.products().list_newest().await?;
///     Ok(Json(products.iter().map(ProductListing::from).collect()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, applies pending migrations.
    ///
    /// File databases are created if missing and run in WAL mode with
    /// `synchronous = NORMAL`. Foreign keys are always enforced: checkout
    /// relies on them to reject line items for unknown products.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::new("./storefront.db")).await?;
    /// ```
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            in_memory = config.is_in_memory(),
            "Initializing database connection"
        );

        let connect_options = connect_options(&config)?;

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending embedded migrations. Already-applied ones are skipped.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// The raw pool, for statements no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Catalog reads and admin writes.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Persisted carts keyed by (user, product).
    pub fn cart(&self) -> CartRepository {
        CartRepository::new(self.pool.clone())
    }

    /// Order reads. Orders are only written by [`Database::checkout`].
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Creates an order from a checkout request.
    ///
    /// See [`crate::checkout`] for the sequence and how `options.mode`
    /// changes what a failure leaves behind.
    pub async fn checkout(
        &self,
        request: &CheckoutRequest,
        options: CheckoutOptions,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        checkout::checkout_with_pool(&self.pool, request, options).await
    }

    /// Returns `(total_migrations, applied_migrations)`.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.pool).await
    }

    /// Closes the pool once the HTTP listener has drained. Every later query
    /// fails.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Whether a trivial query succeeds. Backs `GET /api/health`.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
