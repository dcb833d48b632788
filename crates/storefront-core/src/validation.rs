//! # Validation Module
//!
//! Input validation utilities for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (axum + serde)                               │
//! │  ├── Body shape, field types                                           │
//! │  └── x-user-id header present                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Field rules (lengths, ranges, non-empty lists)                    │
//! │  └── Runs before any query is issued                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 1)                                             │
//! │  ├── UNIQUE (email), PRIMARY KEY (user_id, product_id)                 │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_product_id, validate_quantity};
//!
//! validate_product_id(42).unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_USER_ID_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Longest accepted product description.
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Most ids accepted in one lookup request.
pub const MAX_ID_LIST_LEN: usize = 500;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Green Tea 100g").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a product description. Empty is allowed.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

/// Validates a caller's user id as issued by the identity provider.
///
/// The id is opaque: any non-blank string of at most 128 characters without
/// surrounding whitespace.
pub fn validate_user_id(user_id: &str) -> ValidationResult<()> {
    if user_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "user_id".to_string(),
        });
    }

    if user_id.chars().count() > MAX_USER_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "user_id".to_string(),
            max: MAX_USER_ID_LEN,
        });
    }

    if user_id.trim() != user_id {
        return Err(ValidationError::InvalidFormat {
            field: "user_id".to_string(),
            reason: "must not have leading or trailing whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Only a structural check: one `@` with a non-empty local part and a dotted
/// domain. Ownership is the identity provider's concern.
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_email;
///
/// assert!(validate_email("ada@example.com").is_ok());
/// assert!(validate_email("ada@localhost").is_err());
/// assert!(validate_email("not-an-email").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing @"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must have exactly one @ and a local part"));
    }

    if domain.starts_with('.') || domain.ends_with('.') || !domain.contains('.') {
        return Err(invalid("domain must contain a dot"));
    }

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    Ok(())
}

/// Validates the file name of an already-uploaded product image.
///
/// ## Rules
/// - Must not be empty
/// - Must not contain path separators or `..`
pub fn validate_image_file_name(file_name: &str) -> ValidationResult<()> {
    let file_name = file_name.trim();

    if file_name.is_empty() {
        return Err(ValidationError::Required {
            field: "image".to_string(),
        });
    }

    if file_name.len() > 255 {
        return Err(ValidationError::TooLong {
            field: "image".to_string(),
            max: 255,
        });
    }

    if file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
        return Err(ValidationError::InvalidFormat {
            field: "image".to_string(),
            reason: "must be a plain file name".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Set Quantity                                                     │
/// │                                                                         │
/// │  PUT /api/cart/items/7 { "quantity": 5 }                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → 400 "quantity must be positive"                  │
/// │       │                                                                 │
/// │       ├── qty > 999? → 400 "quantity must be between 1 and 999"        │
/// │       │                                                                 │
/// │       └── OK → CartRepository::set_quantity                            │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the price of a product being created or updated.
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_err());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock count. Zero is allowed.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a store-generated id (product, category or order).
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

#[inline]
pub fn validate_product_id(id: i64) -> ValidationResult<()> {
    validate_id("product_id", id)
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates a list of ids for a batch lookup.
///
/// ## Rules
/// - Must contain at least one id
/// - At most 500 ids
/// - Every id must be positive
pub fn validate_id_list(field: &str, ids: &[i64]) -> ValidationResult<()> {
    if ids.is_empty() {
        return Err(ValidationError::EmptyList {
            field: field.to_string(),
        });
    }

    if ids.len() > MAX_ID_LIST_LEN {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_ID_LIST_LEN as i64,
        });
    }

    ids.iter().try_for_each(|&id| validate_id(field, id))
}

// =============================================================================
// Unit Tests
// =============================================================================
