//! # Checkout Pricing
//!
//! Validation of checkout requests and server-side pricing of their items.
//!
//! ## Where This Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/checkout { user_id, items: [{product_id, quantity}] }        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CheckoutRequest::validate()      ← empty or oversized, no writes      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  distinct_product_ids() ──► store: SELECT id, price_cents ... IN (...) │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_items(items, &PriceBook, policy)  ← THIS MODULE                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PricedOrder { total, lines } ──► INSERT orders, INSERT order_items    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices always come from the [`PriceBook`]; a request never carries one.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_product_id, validate_quantity, validate_user_id};
use crate::MAX_CHECKOUT_ITEMS;

// =============================================================================
// Request Types
// =============================================================================

/// One (product, quantity) pair of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i64,
}

/// A checkout as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutRequest {
    pub user_id: String,
    pub items: Vec<CheckoutItem>,
}

impl CheckoutRequest {
    /// Checks the request shape. Runs before any store access.
    pub fn validate(&self) -> CoreResult<()> {
        validate_user_id(&self.user_id)?;

        if self.items.is_empty() {
            return Err(CoreError::EmptyOrder);
        }

        if self.items.len() > MAX_CHECKOUT_ITEMS {
            return Err(ValidationError::OutOfRange {
                field: "items".to_string(),
                min: 1,
                max: MAX_CHECKOUT_ITEMS as i64,
            }
            .into());
        }

        for item in &self.items {
            validate_product_id(item.product_id)?;
            validate_quantity(item.quantity)?;
        }

        Ok(())
    }

    /// Distinct product ids referenced by the request.
    pub fn product_ids(&self) -> Vec<i64> {
        distinct_product_ids(&self.items)
    }
}

/// Product ids of `items` without repeats, in first-seen order.
pub fn distinct_product_ids(items: &[CheckoutItem]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .map(|item| item.product_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

// =============================================================================
// Unknown Product Policy
// =============================================================================

/// What pricing does with a product id missing from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UnknownProductPolicy {
    /// Price unknown products at 0 and continue.
    ///
    /// Only pricing is lenient here. `order_items.product_id` still
    /// references `products`, so the line insert for an unknown id fails
    /// and the checkout ends in `CheckoutError::LineInsert`.
    #[default]
    ZeroPrice,
    /// Fail the whole checkout, naming the unknown ids.
    Reject,
}

impl fmt::Display for UnknownProductPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownProductPolicy::ZeroPrice => write!(f, "zero_price"),
            UnknownProductPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for UnknownProductPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero_price" | "zero" => Ok(UnknownProductPolicy::ZeroPrice),
            "reject" => Ok(UnknownProductPolicy::Reject),
            other => Err(ValidationError::InvalidFormat {
                field: "unknown_product_policy".to_string(),
                reason: format!("expected zero_price or reject, got {:?}", other),
            }),
        }
    }
}

// =============================================================================
// Price Book
// =============================================================================

/// Authoritative unit prices fetched from the catalog at checkout time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceBook(HashMap<i64, Money>);

impl PriceBook {
    pub fn new() -> Self {
        PriceBook(HashMap::new())
    }

    pub fn insert(&mut self, product_id: i64, price: Money) {
        self.0.insert(product_id, price);
    }

    pub fn get(&self, product_id: i64) -> Option<Money> {
        self.0.get(&product_id).copied()
    }

    pub fn contains(&self, product_id: i64) -> bool {
        self.0.contains_key(&product_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ids from `product_ids` with no price in the book, without repeats.
    pub fn missing(&self, product_ids: &[i64]) -> Vec<i64> {
        let mut seen = HashSet::new();
        product_ids
            .iter()
            .copied()
            .filter(|id| !self.contains(*id) && seen.insert(*id))
            .collect()
    }
}

impl FromIterator<(i64, Money)> for PriceBook {
    fn from_iter<I: IntoIterator<Item = (i64, Money)>>(iter: I) -> Self {
        PriceBook(iter.into_iter().collect())
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// One checkout item with its server-side unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
}

impl PricedLine {
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The result of pricing a checkout: one line per request item and the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedOrder {
    pub total: Money,
    pub lines: Vec<PricedLine>,
    /// Ids priced at zero because the catalog did not know them.
    pub unknown_products: Vec<i64>,
}

/// Prices `items` against `prices`.
///
/// `total = Σ quantity × unit price`, with every unit price taken from the
/// book. Duplicate product ids stay separate lines.
///
/// ## Errors
/// - `EmptyOrder` when `items` is empty
/// - `UnknownProducts` when the policy is `Reject` and an id has no price
/// - `TotalOverflow` when the total does not fit in an i64
pub fn price_items(
    items: &[CheckoutItem],
    prices: &PriceBook,
    policy: UnknownProductPolicy,
) -> CoreResult<PricedOrder> {
    if items.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    let unknown_products = prices.missing(&distinct_product_ids(items));
    if policy == UnknownProductPolicy::Reject && !unknown_products.is_empty() {
        return Err(CoreError::UnknownProducts(unknown_products));
    }

    let mut total = Money::zero();
    let mut lines = Vec::with_capacity(items.len());

    for item in items {
        let unit_price = prices.get(item.product_id).unwrap_or_default();
        let line_total = unit_price
            .checked_multiply_quantity(item.quantity)
            .ok_or(CoreError::TotalOverflow)?;
        total = total.checked_add(line_total).ok_or(CoreError::TotalOverflow)?;

        lines.push(PricedLine {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price,
        });
    }

    Ok(PricedOrder {
        total,
        lines,
        unknown_products,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: i64, quantity: i64) -> CheckoutItem {
        CheckoutItem {
            product_id,
            quantity,
        }
    }

    fn book(entries: &[(i64, i64)]) -> PriceBook {
        entries
            .iter()
            .map(|&(id, cents)| (id, Money::from_cents(cents)))
            .collect()
    }

    #[test]
    fn test_validate_item_count_limit() {
        let at_limit = CheckoutRequest {
            user_id: "u1".to_string(),
            items: vec![item(1, 1); MAX_CHECKOUT_ITEMS],
        };
        assert!(at_limit.validate().is_ok());

        let over = CheckoutRequest {
            user_id: "u1".to_string(),
            items: vec![item(1, 1); MAX_CHECKOUT_ITEMS + 1],
        };
        assert!(matches!(
            over.validate(),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_single_item_total() {
        let priced = price_items(&[item(1, 2)], &book(&[(1, 500)]), UnknownProductPolicy::ZeroPrice)
            .unwrap();

        assert_eq!(priced.total.cents(), 1000);
        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.lines[0].unit_price.cents(), 500);
        assert_eq!(priced.lines[0].quantity, 2);
    }

    #[test]
    fn test_total_is_sum_of_server_prices() {
        let items = [item(1, 3), item(2, 1), item(3, 4)];
        let prices = book(&[(1, 250), (2, 1999), (3, 5)]);

        let priced = price_items(&items, &prices, UnknownProductPolicy::ZeroPrice).unwrap();

        let expected: i64 = 3 * 250 + 1999 + 4 * 5;
        assert_eq!(priced.total.cents(), expected);
        let line_sum: Money = priced.lines.iter().map(PricedLine::line_total).sum();
        assert_eq!(line_sum, priced.total);
    }

    #[test]
    fn test_duplicate_items_stay_separate_lines() {
        let items = [item(1, 1), item(1, 2)];
        let priced = price_items(&items, &book(&[(1, 100)]), UnknownProductPolicy::ZeroPrice)
            .unwrap();

        assert_eq!(priced.lines.len(), 2);
        assert_eq!(priced.total.cents(), 300);
        assert_eq!(distinct_product_ids(&items), vec![1]);
    }

    #[test]
    fn test_unknown_product_zero_price() {
        let items = [item(1, 2), item(42, 5)];
        let priced = price_items(&items, &book(&[(1, 500)]), UnknownProductPolicy::ZeroPrice)
            .unwrap();

        assert_eq!(priced.total.cents(), 1000);
        assert_eq!(priced.lines[1].unit_price, Money::zero());
        assert_eq!(priced.unknown_products, vec![42]);
    }

    #[test]
    fn test_unknown_product_reject() {
        let items = [item(1, 2), item(42, 5), item(43, 1), item(42, 1)];
        let err = price_items(&items, &book(&[(1, 500)]), UnknownProductPolicy::Reject)
            .unwrap_err();

        match err {
            CoreError::UnknownProducts(ids) => assert_eq!(ids, vec![42, 43]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_items_rejected() {
        let err = price_items(&[], &PriceBook::new(), UnknownProductPolicy::ZeroPrice).unwrap_err();
        assert!(matches!(err, CoreError::EmptyOrder));

        let request = CheckoutRequest {
            user_id: "u1".to_string(),
            items: vec![],
        };
        assert!(matches!(request.validate(), Err(CoreError::EmptyOrder)));
    }

    #[test]
    fn test_request_validation() {
        let ok = CheckoutRequest {
            user_id: "u1".to_string(),
            items: vec![item(1, 1)],
        };
        assert!(ok.validate().is_ok());

        let bad_qty = CheckoutRequest {
            user_id: "u1".to_string(),
            items: vec![item(1, 0)],
        };
        assert!(matches!(bad_qty.validate(), Err(CoreError::Validation(_))));

        let bad_user = CheckoutRequest {
            user_id: "".to_string(),
            items: vec![item(1, 1)],
        };
        assert!(bad_user.validate().is_err());
    }

    #[test]
    fn test_overflow_rejected() {
        let prices = book(&[(1, i64::MAX / 2)]);
        let err = price_items(&[item(1, 3)], &prices, UnknownProductPolicy::ZeroPrice).unwrap_err();
        assert!(matches!(err, CoreError::TotalOverflow));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "reject".parse::<UnknownProductPolicy>().unwrap(),
            UnknownProductPolicy::Reject
        );
        assert_eq!(
            "ZERO_PRICE".parse::<UnknownProductPolicy>().unwrap(),
            UnknownProductPolicy::ZeroPrice
        );
        assert!("drop".parse::<UnknownProductPolicy>().is_err());
        assert_eq!(UnknownProductPolicy::default().to_string(), "zero_price");
    }

    #[test]
    fn test_request_deserializes_from_json() {
        let request: CheckoutRequest = serde_json::from_str(
            r#"{"user_id":"u1","items":[{"product_id":1,"quantity":2}]}"#,
        )
        .unwrap();
        assert_eq!(request.items, vec![item(1, 2)]);
        assert_eq!(request.product_ids(), vec![1]);
    }
}
