//! # storefront-core: Pure Business Logic for the Storefront
//!
//! This crate contains the domain logic of the storefront as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web client (browser)                         │   │
//! │  │    Catalog ──► Cart ──► Checkout ──► Order history              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    storefront-api (axum)                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ storefront-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │ checkout │ │validate │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └─────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-db (Database Layer)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, CartLine, User, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart merge policy (add increments, remove deletes)
//! - [`checkout`] - Checkout request validation and server-side pricing
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::checkout::{price_items, CheckoutItem, PriceBook, UnknownProductPolicy};
//! use storefront_core::money::Money;
//!
//! let mut prices = PriceBook::new();
//! prices.insert(1, Money::from_cents(500));
//!
//! let items = [CheckoutItem { product_id: 1, quantity: 2 }];
//! let priced = price_items(&items, &prices, UnknownProductPolicy::ZeroPrice).unwrap();
//!
//! assert_eq!(priced.total.cents(), 1000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum items in a single checkout request.
pub const MAX_CHECKOUT_ITEMS: usize = MAX_CART_ITEMS;

/// Maximum quantity of a single product in a cart line or checkout item.
///
/// Guards against typos like 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum length of an identity-provider user id.
pub const MAX_USER_ID_LEN: usize = 128;
