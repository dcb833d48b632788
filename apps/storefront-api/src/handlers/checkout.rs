//! # Checkout Handler
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/checkout { user_id, items: [{ product_id, quantity }] }      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::checkout(request, options)                                   │
//! │       │  Invalid ──────────────────────────► 400 VALIDATION_ERROR       │
//! │       │  PriceLookup / OrderInsert /                                    │
//! │       │  LineInsert / Commit ──────────────► 500 CHECKOUT_FAILED        │
//! │       ▼                                                                 │
//! │  x-user-id == user_id? ── no ──► cart left as is                        │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  clear the caller's persisted cart (failure only logged)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  200 { "message": "Order placed successfully", "order_id": 17 }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use storefront_core::checkout::CheckoutRequest;
use tracing::{debug, warn};

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::state::AppState;

pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub message: String,
    pub order_id: i64,
}

/// `POST /api/checkout`
///
/// Prices come from the catalog; the body only names products and
/// quantities. The persisted cart is cleared only for a caller whose
/// `x-user-id` matches the order's `user_id`.
pub async fn checkout(
    State(state): State<AppState>,
    caller: Option<CurrentUser>,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ApiResult<Json<CheckoutResponse>> {
    let Json(request) = body?;

    let receipt = state
        .db
        .checkout(&request, state.checkout_options())
        .await?;

    let by_owner = caller.as_ref().map(CurrentUser::id) == Some(request.user_id.as_str());

    if by_owner {
        match state.db.cart().clear(&request.user_id).await {
            Ok(removed) => debug!(user_id = %request.user_id, removed, "Cart cleared after checkout"),
            Err(e) => warn!(
                user_id = %request.user_id,
                order_id = receipt.order.id,
                error = %e,
                "Order placed but cart could not be cleared"
            ),
        }
    } else {
        debug!(
            user_id = %request.user_id,
            order_id = receipt.order.id,
            "Checkout not made by the cart owner, cart left as is"
        );
    }

    Ok(Json(CheckoutResponse {
        message: ORDER_PLACED_MESSAGE.to_string(),
        order_id: receipt.order.id,
    }))
}
