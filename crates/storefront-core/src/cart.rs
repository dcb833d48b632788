//! # Cart Merge Policy
//!
//! A user's cart as an in-memory value, and the rules for changing it.
//!
//! The database layer loads a user's persisted lines into a [`Cart`], applies
//! one operation here, and writes back the returned [`CartChange`]. Keeping
//! the policy here means every rule is testable without a database.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operation            Line present?     Result                          │
//! │  ─────────            ─────────────     ──────                          │
//! │                                                                         │
//! │  add(p, n)            yes               qty += n       → Upsert         │
//! │                       no                push (p, n)    → Upsert         │
//! │                                                                         │
//! │  set_quantity(p, n)   yes / no          qty = n (n>=1) → Upsert         │
//! │                                                                         │
//! │  remove(p)            yes               delete line    → Remove         │
//! │                       no                NotInCart                       │
//! │                                                                         │
//! │  clear()              -                 delete all     → Clear          │
//! │                                                                         │
//! │  Limits: qty 1..=999 per line, at most 100 distinct lines.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::CartLine;
use crate::validation::{validate_product_id, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// The write a cart operation needs persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartChange {
    /// Insert the line or overwrite its quantity.
    Upsert { product_id: i64, quantity: i64 },
    /// Delete the line.
    Remove { product_id: i64 },
    /// Delete every line of the cart's owner.
    Clear,
}

/// A user's cart.
///
/// ## Invariants
/// - Lines are unique by `product_id`
/// - Every quantity is in `1..=MAX_ITEM_QUANTITY`
/// - At most `MAX_CART_ITEMS` lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    user_id: String,
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart for a user.
    pub fn new(user_id: impl Into<String>) -> Self {
        Cart {
            user_id: user_id.into(),
            lines: Vec::new(),
        }
    }

    /// Rebuilds a cart from persisted lines.
    ///
    /// Lines belonging to other users are dropped. Should the store ever hold
    /// two lines for one product, their quantities are merged.
    pub fn from_lines(user_id: impl Into<String>, lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Cart::new(user_id);
        for line in lines {
            if line.user_id != cart.user_id {
                continue;
            }
            match cart.position(line.product_id) {
                Some(i) => cart.lines[i].quantity += line.quantity,
                None => cart.lines.push(line),
            }
        }
        cart
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity of a product in the cart, if present.
    pub fn quantity_of(&self, product_id: i64) -> Option<i64> {
        self.position(product_id).map(|i| self.lines[i].quantity)
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds `quantity` of a product.
    ///
    /// Increments an existing line; otherwise appends a new one.
    pub fn add(&mut self, product_id: i64, quantity: i64) -> CoreResult<CartChange> {
        validate_product_id(product_id)?;
        validate_quantity(quantity)?;

        if let Some(i) = self.position(product_id) {
            let line = &mut self.lines[i];
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(CartChange::Upsert {
                product_id,
                quantity: new_qty,
            });
        }

        self.push_line(product_id, quantity)
    }

    /// Sets a line's quantity, creating the line if absent.
    ///
    /// Quantities below 1 are rejected; use [`Cart::remove`] to drop a line.
    pub fn set_quantity(&mut self, product_id: i64, quantity: i64) -> CoreResult<CartChange> {
        validate_product_id(product_id)?;
        validate_quantity(quantity)?;

        match self.position(product_id) {
            Some(i) => {
                self.lines[i].quantity = quantity;
                Ok(CartChange::Upsert {
                    product_id,
                    quantity,
                })
            }
            None => self.push_line(product_id, quantity),
        }
    }

    /// Removes a product's line outright.
    pub fn remove(&mut self, product_id: i64) -> CoreResult<CartChange> {
        let i = self
            .position(product_id)
            .ok_or(CoreError::NotInCart(product_id))?;
        self.lines.remove(i);
        Ok(CartChange::Remove { product_id })
    }

    /// Removes every line.
    pub fn clear(&mut self) -> CartChange {
        self.lines.clear();
        CartChange::Clear
    }

    fn position(&self, product_id: i64) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }

    fn push_line(&mut self, product_id: i64, quantity: i64) -> CoreResult<CartChange> {
        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.lines.push(CartLine {
            user_id: self.user_id.clone(),
            product_id,
            quantity,
        });
        Ok(CartChange::Upsert {
            product_id,
            quantity,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
