//! # HTTP Handlers
//!
//! One module per resource. Handlers validate the request shape, call one
//! repository or the checkout sequence, and reshape the result.
//!
//! ## Module Organization
//! - [`health`] - Liveness and database reachability
//! - [`products`] - Catalog reads and admin writes
//! - [`categories`] - Category list
//! - [`cart`] - Persisted cart and the client-held cart lookup
//! - [`checkout`] - Order creation
//! - [`profile`] - Order history
//! - [`users`] - The caller's user row

pub mod cart;
pub mod categories;
pub mod checkout;
pub mod health;
pub mod products;
pub mod profile;
pub mod users;
