//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │   OrderLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  order_id (FK)  │       │
//! │  │  name           │   │  user_id        │   │  product_id     │       │
//! │  │  price_cents    │   │  total_cents    │   │  quantity       │       │
//! │  │  stock          │   │  created_at     │   │  price_cents    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CartLine     │   │      User       │   │    Category     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  user_id        │   │  id (text)      │   │  id (i64)       │       │
//! │  │  product_id     │   │  email          │   │  name           │       │
//! │  │  quantity       │   │  role           │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `OrderLine.price_cents` is copied from the catalog at checkout and never
//! recomputed, so historical orders survive later price changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Base URL for products that were uploaded without an image.
pub const PLACEHOLDER_IMAGE_BASE: &str = "https://via.placeholder.com/300x300?text=";

// =============================================================================
// Users
// =============================================================================

/// Role of a user. Only admins may create or edit products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

/// A user mirrored from the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    /// Identity-provider user id.
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl User {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Store-generated identifier.
    pub id: i64,

    /// Display name.
    pub name: String,

    pub description: Option<String>,

    /// Price in cents. Authoritative at checkout time.
    pub price_cents: i64,

    /// Units on hand.
    pub stock: i64,

    pub category_id: Option<i64>,

    /// Public URL of the product image in file storage.
    pub image_url: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Image URL for display, falling back to a placeholder built from the name.
    pub fn display_image_url(&self) -> String {
        match &self.image_url {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => placeholder_image_url(&self.name),
        }
    }
}

/// Builds the placeholder image URL for a product name.
pub fn placeholder_image_url(name: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("{}{}", PLACEHOLDER_IMAGE_BASE, encoded)
}

/// Fields for a product being created by an admin.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub stock: i64,
    pub category_id: i64,
    pub image_url: String,
}

/// Partial update of a product. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price_cents.is_none()
            && self.stock.is_none()
            && self.category_id.is_none()
            && self.image_url.is_none()
    }
}

/// Catalog listing shape: what the storefront grid shows.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductListing {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub description: Option<String>,
    pub image_url: String,
}

impl From<&Product> for ProductListing {
    fn from(product: &Product) -> Self {
        ProductListing {
            id: product.id,
            name: product.name.clone(),
            price_cents: product.price_cents,
            description: product.description.clone(),
            image_url: product.display_image_url(),
        }
    }
}

/// Minimal (id, name, price) projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PriceListing {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
}

/// Product data a client-held cart needs to render its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CartProduct {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub image_url: Option<String>,
}

// =============================================================================
// Cart
// =============================================================================

/// One persisted (user, product, quantity) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CartLine {
    pub user_id: String,
    pub product_id: i64,
    pub quantity: i64,
}

/// A cart line joined with its product for display.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CartViewLine {
    pub product_id: i64,
    pub quantity: i64,
    pub name: String,
    pub price_cents: i64,
    pub image_url: Option<String>,
}

impl CartViewLine {
    /// Display total at the current catalog price.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.price_cents).multiply_quantity(self.quantity)
    }
}

/// The caller's persisted cart with a display subtotal.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartView {
    pub lines: Vec<CartViewLine>,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
}

impl CartView {
    pub fn new(lines: Vec<CartViewLine>) -> Self {
        let total_quantity = lines.iter().map(|l| l.quantity).sum();
        let subtotal: Money = lines.iter().map(CartViewLine::line_total).sum();
        CartView {
            lines,
            total_quantity,
            subtotal_cents: subtotal.cents(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Orders
// =============================================================================

/// An order created by one checkout. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub user_id: String,
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item of an order. Price is frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Unit price in cents at time of purchase.
    pub price_cents: i64,
}

impl OrderLine {
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.price_cents).multiply_quantity(self.quantity)
    }
}

/// One line in the order history view.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderHistoryItem {
    pub quantity: i64,
    pub price_cents: i64,
    pub product_name: String,
}

/// One order in the order history view.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderHistoryEntry {
    pub id: i64,
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderHistoryItem>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(image_url: Option<&str>) -> Product {
        Product {
            id: 1,
            name: "Green Tea".to_string(),
            description: None,
            price_cents: 500,
            stock: 10,
            category_id: Some(1),
            image_url: image_url.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_default_and_serde() {
        assert_eq!(Role::default(), Role::Customer);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(role, Role::Customer);
    }

    #[test]
    fn test_display_image_url_placeholder() {
        let p = product(None);
        assert_eq!(
            p.display_image_url(),
            "https://via.placeholder.com/300x300?text=Green+Tea"
        );

        let p = product(Some("https://cdn.example.com/tea.png"));
        assert_eq!(p.display_image_url(), "https://cdn.example.com/tea.png");
    }

    #[test]
    fn test_listing_from_product() {
        let listing = ProductListing::from(&product(None));
        assert_eq!(listing.id, 1);
        assert_eq!(listing.price_cents, 500);
        assert!(listing.image_url.starts_with(PLACEHOLDER_IMAGE_BASE));
    }

    #[test]
    fn test_cart_view_totals() {
        let view = CartView::new(vec![
            CartViewLine {
                product_id: 1,
                quantity: 2,
                name: "Tea".to_string(),
                price_cents: 500,
                image_url: None,
            },
            CartViewLine {
                product_id: 2,
                quantity: 1,
                name: "Mug".to_string(),
                price_cents: 1250,
                image_url: None,
            },
        ]);
        assert_eq!(view.total_quantity, 3);
        assert_eq!(view.subtotal_cents, 2250);
    }

    #[test]
    fn test_product_patch_is_empty() {
        assert!(ProductPatch::default().is_empty());
        let patch = ProductPatch {
            price_cents: Some(700),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
