//! # Order-Creation Sequence
//!
//! Turns a checkout request into one order row and its line rows.
//!
//! ## Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  run_checkout(store, request, policy)                                   │
//! │                                                                         │
//! │  1. request.validate()              ──► Invalid      (nothing written)  │
//! │  2. store.fetch_prices(distinct ids)──► PriceLookup  (nothing written)  │
//! │  3. price_items(items, prices)      ──► Invalid      (nothing written)  │
//! │  4. store.insert_order(user, total) ──► OrderInsert  (nothing written)  │
//! │  5. store.insert_order_lines(id, ..)──► LineInsert { order_id }         │
//! │                                                                         │
//! │  CheckoutMode::Transactional   steps 2-5 share one transaction.        │
//! │                                A failure rolls back; COMMIT at the end. │
//! │                                                                         │
//! │  CheckoutMode::Sequential      steps run on the pool. A LineInsert      │
//! │                                failure leaves the order with 0 lines.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sequence is written once against [`OrderStore`]. [`PoolOrderStore`] and
//! [`TxOrderStore`] differ only in the executor they hand to the shared SQL.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool, Transaction};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::push_id_list;
use storefront_core::checkout::{
    price_items, CheckoutRequest, PriceBook, PricedLine, UnknownProductPolicy,
};
use storefront_core::{CoreError, Money, Order, OrderLine};

// =============================================================================
// Options
// =============================================================================

/// Whether the order insert and the line insert share a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMode {
    /// One transaction; a failed line insert leaves no order behind.
    #[default]
    Transactional,
    /// Back-to-back statements on the pool with no rollback.
    Sequential,
}

impl fmt::Display for CheckoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutMode::Transactional => write!(f, "transactional"),
            CheckoutMode::Sequential => write!(f, "sequential"),
        }
    }
}

impl FromStr for CheckoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transactional" => Ok(CheckoutMode::Transactional),
            "sequential" => Ok(CheckoutMode::Sequential),
            other => Err(format!(
                "expected transactional or sequential, got {:?}",
                other
            )),
        }
    }
}

/// Checkout behaviour chosen at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckoutOptions {
    pub mode: CheckoutMode,
    pub unknown_products: UnknownProductPolicy,
}

// =============================================================================
// Errors & Results
// =============================================================================

/// Which step of the checkout failed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Request shape or pricing rule rejected. Nothing was written.
    #[error("invalid checkout: {0}")]
    Invalid(#[from] CoreError),

    #[error("could not begin checkout transaction: {0}")]
    Begin(#[source] DbError),

    #[error("price lookup failed: {0}")]
    PriceLookup(#[source] DbError),

    #[error("order insert failed: {0}")]
    OrderInsert(#[source] DbError),

    /// The order row was inserted but its lines were not.
    #[error("line insert failed for order {order_id}: {source}")]
    LineInsert {
        order_id: i64,
        #[source]
        source: DbError,
    },

    #[error("checkout commit failed: {0}")]
    Commit(#[source] DbError),
}

impl CheckoutError {
    /// Short step name for logs.
    pub fn step(&self) -> &'static str {
        match self {
            CheckoutError::Invalid(_) => "validate",
            CheckoutError::Begin(_) => "begin",
            CheckoutError::PriceLookup(_) => "price_lookup",
            CheckoutError::OrderInsert(_) => "order_insert",
            CheckoutError::LineInsert { .. } => "line_insert",
            CheckoutError::Commit(_) => "commit",
        }
    }

    /// True when the client sent something unacceptable, as opposed to a
    /// store failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CheckoutError::Invalid(_))
    }
}

/// A persisted checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order: Order,
    pub lines: Vec<OrderLine>,
    /// Ids priced at zero under `UnknownProductPolicy::ZeroPrice`.
    pub unknown_products: Vec<i64>,
}

// =============================================================================
// Order Store
// =============================================================================

/// The three store operations the checkout sequence needs.
#[async_trait]
pub trait OrderStore: Send {
    /// Current unit prices for the given ids. Unknown ids are absent.
    async fn fetch_prices(&mut self, product_ids: &[i64]) -> DbResult<PriceBook>;

    /// Inserts one order row and returns it with its generated id.
    async fn insert_order(&mut self, user_id: &str, total: Money) -> DbResult<Order>;

    /// Inserts one line row per priced line, all in one statement.
    async fn insert_order_lines(
        &mut self,
        order_id: i64,
        lines: &[PricedLine],
    ) -> DbResult<Vec<OrderLine>>;
}

/// Runs the checkout sequence against any store.
///
/// Returns `Ok` only after every line row has been inserted.
pub async fn run_checkout<S>(
    store: &mut S,
    request: &CheckoutRequest,
    policy: UnknownProductPolicy,
) -> Result<CheckoutReceipt, CheckoutError>
where
    S: OrderStore + ?Sized,
{
    request.validate()?;

    let product_ids = request.product_ids();
    let prices = store
        .fetch_prices(&product_ids)
        .await
        .map_err(CheckoutError::PriceLookup)?;

    let priced = price_items(&request.items, &prices, policy)?;
    if !priced.unknown_products.is_empty() {
        warn!(
            unknown = ?priced.unknown_products,
            "Pricing unknown products at zero"
        );
    }

    let order = store
        .insert_order(&request.user_id, priced.total)
        .await
        .map_err(CheckoutError::OrderInsert)?;

    debug!(order_id = order.id, total_cents = order.total_cents, "Order row inserted");

    let lines = store
        .insert_order_lines(order.id, &priced.lines)
        .await
        .map_err(|source| CheckoutError::LineInsert {
            order_id: order.id,
            source,
        })?;

    Ok(CheckoutReceipt {
        order,
        lines,
        unknown_products: priced.unknown_products,
    })
}

/// Store that runs every statement directly on the pool.
#[derive(Debug, Clone)]
pub struct PoolOrderStore {
    pool: SqlitePool,
}

impl PoolOrderStore {
    pub fn new(pool: SqlitePool) -> Self {
        PoolOrderStore { pool }
    }
}

#[async_trait]
impl OrderStore for PoolOrderStore {
    async fn fetch_prices(&mut self, product_ids: &[i64]) -> DbResult<PriceBook> {
        select_prices(&self.pool, product_ids).await
    }

    async fn insert_order(&mut self, user_id: &str, total: Money) -> DbResult<Order> {
        insert_order_row(&self.pool, user_id, total).await
    }

    async fn insert_order_lines(
        &mut self,
        order_id: i64,
        lines: &[PricedLine],
    ) -> DbResult<Vec<OrderLine>> {
        insert_line_rows(&self.pool, order_id, lines).await
    }
}

/// Store that runs every statement inside one transaction.
///
/// Dropping it without [`TxOrderStore::commit`] rolls everything back.
#[derive(Debug)]
pub struct TxOrderStore {
    tx: Transaction<'static, Sqlite>,
}

impl TxOrderStore {
    pub async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let tx = pool.begin().await.map_err(DbError::transaction)?;
        Ok(TxOrderStore { tx })
    }

    pub async fn commit(self) -> DbResult<()> {
        self.tx.commit().await.map_err(DbError::transaction)
    }
}

#[async_trait]
impl OrderStore for TxOrderStore {
    async fn fetch_prices(&mut self, product_ids: &[i64]) -> DbResult<PriceBook> {
        select_prices(&mut *self.tx, product_ids).await
    }

    async fn insert_order(&mut self, user_id: &str, total: Money) -> DbResult<Order> {
        insert_order_row(&mut *self.tx, user_id, total).await
    }

    async fn insert_order_lines(
        &mut self,
        order_id: i64,
        lines: &[PricedLine],
    ) -> DbResult<Vec<OrderLine>> {
        insert_line_rows(&mut *self.tx, order_id, lines).await
    }
}

/// Runs a checkout in the configured mode and logs the outcome.
pub(crate) async fn checkout_with_pool(
    pool: &SqlitePool,
    request: &CheckoutRequest,
    options: CheckoutOptions,
) -> Result<CheckoutReceipt, CheckoutError> {
    // Reject bad input before a transaction or connection is taken.
    request.validate()?;

    let result = match options.mode {
        CheckoutMode::Transactional => {
            let mut store = TxOrderStore::begin(pool).await.map_err(CheckoutError::Begin)?;
            match run_checkout(&mut store, request, options.unknown_products).await {
                Ok(receipt) => store
                    .commit()
                    .await
                    .map(|_| receipt)
                    .map_err(CheckoutError::Commit),
                Err(err) => Err(err),
            }
        }
        CheckoutMode::Sequential => {
            let mut store = PoolOrderStore::new(pool.clone());
            run_checkout(&mut store, request, options.unknown_products).await
        }
    };

    match &result {
        Ok(receipt) => info!(
            order_id = receipt.order.id,
            user_id = %receipt.order.user_id,
            total_cents = receipt.order.total_cents,
            lines = receipt.lines.len(),
            mode = %options.mode,
            "Order created"
        ),
        Err(err) if err.is_invalid_input() => {
            debug!(error = %err, "Checkout rejected");
        }
        Err(CheckoutError::LineInsert { order_id, source }) => {
            let orphaned = options.mode == CheckoutMode::Sequential;
            error!(
                order_id,
                orphaned,
                error = %source,
                mode = %options.mode,
                "Checkout failed inserting order lines"
            );
        }
        Err(err) => error!(step = err.step(), error = %err, mode = %options.mode, "Checkout failed"),
    }

    result
}

// =============================================================================
// Shared SQL
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct PriceRow {
    id: i64,
    price_cents: i64,
}

async fn select_prices<'e, E>(executor: E, product_ids: &[i64]) -> DbResult<PriceBook>
where
    E: Executor<'e, Database = Sqlite>,
{
    if product_ids.is_empty() {
        return Ok(PriceBook::new());
    }

    let mut builder = QueryBuilder::<Sqlite>::new("SELECT id, price_cents FROM products WHERE id IN ");
    push_id_list(&mut builder, product_ids);

    let rows = builder
        .build_query_as::<PriceRow>()
        .fetch_all(executor)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.id, Money::from_cents(row.price_cents)))
        .collect())
}

async fn insert_order_row<'e, E>(executor: E, user_id: &str, total: Money) -> DbResult<Order>
where
    E: Executor<'e, Database = Sqlite>,
{
    let order = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (user_id, total_cents, created_at)
        VALUES (?1, ?2, ?3)
        RETURNING id, user_id, total_cents, created_at
        "#,
    )
    .bind(user_id)
    .bind(total.cents())
    .bind(Utc::now())
    .fetch_one(executor)
    .await?;

    Ok(order)
}

async fn insert_line_rows<'e, E>(
    executor: E,
    order_id: i64,
    lines: &[PricedLine],
) -> DbResult<Vec<OrderLine>>
where
    E: Executor<'e, Database = Sqlite>,
{
    if lines.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder =
        QueryBuilder::<Sqlite>::new("INSERT INTO order_items (order_id, product_id, quantity, price_cents) ");
    builder.push_values(lines, |mut row, line| {
        row.push_bind(order_id)
            .push_bind(line.product_id)
            .push_bind(line.quantity)
            .push_bind(line.unit_price.cents());
    });
    builder.push(" RETURNING id, order_id, product_id, quantity, price_cents");

    let mut inserted = builder
        .build_query_as::<OrderLine>()
        .fetch_all(executor)
        .await?;
    inserted.sort_by_key(|line| line.id);

    Ok(inserted)
}

// =============================================================================
// Unit Tests
// =============================================================================
