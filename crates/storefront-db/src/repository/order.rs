//! # Order Repository
//!
//! Read side of orders. Orders are written only by the checkout sequence
//! (see [`crate::checkout`]) and never updated or deleted.
//!
//! ## Order History
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. SELECT orders WHERE user_id = ? ORDER BY created_at DESC            │
//! │  2. SELECT order_items LEFT JOIN products WHERE order_id IN (...)      │
//! │     product name falls back to 'Unknown' when the product row is gone  │
//! │  3. Group lines under their order, preserving the order of step 1      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::push_id_list;
use storefront_core::{Order, OrderHistoryEntry, OrderHistoryItem, OrderLine};

/// Product name shown for a line whose product no longer exists.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown";

#[derive(Debug, FromRow)]
struct HistoryLineRow {
    order_id: i64,
    quantity: i64,
    price_cents: i64,
    product_name: String,
}

#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, user_id, total_cents, created_at FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Line items of one order in insertion order.
    pub async fn lines(&self, order_id: i64) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT id, order_id, product_id, quantity, price_cents
            FROM order_items
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// All orders of a user, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, total_cents, created_at
            FROM orders
            WHERE user_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Order history for the profile page: orders newest first, each with
    /// its lines and product names.
    pub async fn history(&self, user_id: &str) -> DbResult<Vec<OrderHistoryEntry>> {
        let orders = self.list_for_user(user_id).await?;
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();

        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT oi.order_id, oi.quantity, oi.price_cents, COALESCE(p.name, ",
        );
        builder.push_bind(UNKNOWN_PRODUCT_NAME);
        builder.push(
            r#") AS product_name
            FROM order_items oi
            LEFT JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id IN "#,
        );
        push_id_list(&mut builder, &order_ids);
        builder.push(" ORDER BY oi.order_id, oi.id");

        let rows = builder
            .build_query_as::<HistoryLineRow>()
            .fetch_all(&self.pool)
            .await?;

        debug!(user_id = %user_id, orders = orders.len(), lines = rows.len(), "Loaded order history");

        let mut items_by_order: HashMap<i64, Vec<OrderHistoryItem>> = HashMap::new();
        for row in rows {
            items_by_order
                .entry(row.order_id)
                .or_default()
                .push(OrderHistoryItem {
                    quantity: row.quantity,
                    price_cents: row.price_cents,
                    product_name: row.product_name,
                });
        }

        Ok(orders
            .into_iter()
            .map(|order| OrderHistoryEntry {
                items: items_by_order.remove(&order.id).unwrap_or_default(),
                id: order.id,
                total_cents: order.total_cents,
                created_at: order.created_at,
            })
            .collect())
    }

    /// Number of orders a user has (diagnostics and tests).
    pub async fn count_for_user(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
