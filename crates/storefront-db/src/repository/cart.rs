//! # Cart Repository
//!
//! Persisted carts, one row per (user, product).
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    SELECT user's lines            ──► Cart::from_lines                  │
//! │    (add / set) product exists?    ──► ProductNotFound if not            │
//! │    Cart::add / set_quantity / remove / clear  ──► CartChange           │
//! │    Upsert → INSERT ... ON CONFLICT (user_id, product_id) DO UPDATE      │
//! │    Remove → DELETE one line                                            │
//! │    Clear  → DELETE all lines of this user                              │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The merge rules live in [`storefront_core::cart`]; this module only loads
//! and stores.

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::cart::{Cart, CartChange};
use storefront_core::{CartLine, CartView, CartViewLine, CoreError, CoreResult};

#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// The user's raw lines in insertion order.
    pub async fn lines(&self, user_id: &str) -> DbResult<Vec<CartLine>> {
        select_lines(&self.pool, user_id).await
    }

    /// The user's cart joined with current product data.
    pub async fn view(&self, user_id: &str) -> DbResult<CartView> {
        let lines = sqlx::query_as::<_, CartViewLine>(
            r#"
            SELECT c.product_id, c.quantity, p.name, p.price_cents, p.image_url
            FROM cart c
            INNER JOIN products p ON p.id = c.product_id
            WHERE c.user_id = ?1
            ORDER BY c.rowid
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(CartView::new(lines))
    }

    /// Adds `quantity` of a product, incrementing an existing line.
    pub async fn add(&self, user_id: &str, product_id: i64, quantity: i64) -> DbResult<CartView> {
        debug!(user_id = %user_id, product_id, quantity, "Adding to cart");
        self.apply(user_id, Some(product_id), |cart| cart.add(product_id, quantity))
            .await
    }

    /// Sets a line's quantity (at least 1), creating the line if absent.
    pub async fn set_quantity(
        &self,
        user_id: &str,
        product_id: i64,
        quantity: i64,
    ) -> DbResult<CartView> {
        debug!(user_id = %user_id, product_id, quantity, "Setting cart quantity");
        self.apply(user_id, Some(product_id), |cart| {
            cart.set_quantity(product_id, quantity)
        })
        .await
    }

    /// Removes a product's line.
    pub async fn remove(&self, user_id: &str, product_id: i64) -> DbResult<CartView> {
        debug!(user_id = %user_id, product_id, "Removing from cart");
        self.apply(user_id, None, |cart| cart.remove(product_id)).await
    }

    /// Deletes every line of this user. Returns the number of lines removed.
    pub async fn clear(&self, user_id: &str) -> DbResult<u64> {
        debug!(user_id = %user_id, "Clearing cart");

        let result = sqlx::query("DELETE FROM cart WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Loads the cart, applies one policy operation and persists its change,
    /// all inside one transaction.
    async fn apply<F>(&self, user_id: &str, must_exist: Option<i64>, op: F) -> DbResult<CartView>
    where
        F: FnOnce(&mut Cart) -> CoreResult<CartChange>,
    {
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        if let Some(product_id) = must_exist {
            let found: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;
            if found.is_none() {
                return Err(CoreError::ProductNotFound(product_id).into());
            }
        }

        let mut cart = Cart::from_lines(user_id, select_lines(&mut *tx, user_id).await?);
        let change = op(&mut cart)?;
        write_change(&mut *tx, user_id, &change).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        self.view(user_id).await
    }
}

async fn select_lines<'e, E>(executor: E, user_id: &str) -> DbResult<Vec<CartLine>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let lines = sqlx::query_as::<_, CartLine>(
        "SELECT user_id, product_id, quantity FROM cart WHERE user_id = ?1 ORDER BY rowid",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(lines)
}

async fn write_change<'e, E>(executor: E, user_id: &str, change: &CartChange) -> DbResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    match change {
        CartChange::Upsert {
            product_id,
            quantity,
        } => {
            sqlx::query(
                r#"
                INSERT INTO cart (user_id, product_id, quantity)
                VALUES (?1, ?2, ?3)
                ON CONFLICT (user_id, product_id) DO UPDATE SET quantity = excluded.quantity
                "#,
            )
            .bind(user_id)
            .bind(product_id)
            .bind(quantity)
            .execute(executor)
            .await?;
        }
        CartChange::Remove { product_id } => {
            sqlx::query("DELETE FROM cart WHERE user_id = ?1 AND product_id = ?2")
                .bind(user_id)
                .bind(product_id)
                .execute(executor)
                .await?;
        }
        CartChange::Clear => {
            sqlx::query("DELETE FROM cart WHERE user_id = ?1")
                .bind(user_id)
                .execute(executor)
                .await?;
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
