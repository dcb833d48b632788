//! # Repository Module
//!
//! Database repository implementations for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.cart().add(user_id, product_id, 1)                         │
//! │       ▼                                                                 │
//! │  CartRepository                                                        │
//! │  ├── view(&self, user_id)                                              │
//! │  ├── add(&self, user_id, product_id, qty)                              │
//! │  ├── set_quantity / remove / clear                                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog reads and admin writes
//! - [`CategoryRepository`](category::CategoryRepository) - Category list
//! - [`UserRepository`](user::UserRepository) - Mirrored identity-provider users
//! - [`CartRepository`](cart::CartRepository) - Persisted carts
//! - [`OrderRepository`](order::OrderRepository) - Orders and order history

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod user;

use sqlx::{QueryBuilder, Sqlite};

/// Appends `(?, ?, ...)` with one bound parameter per id.
///
/// Callers must not pass an empty slice: `IN ()` is a syntax error in SQLite.
pub(crate) fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, ids: &[i64]) {
    builder.push("(");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}
