//! # Cart Handlers
//!
//! Two cart styles share this module:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Client-held cart                 Persisted cart                        │
//! │  ────────────────                 ──────────────                        │
//! │  POST /api/cart                   GET    /api/cart/items                │
//! │  { productIds: [..] }             POST   /api/cart/items                │
//! │       │                           PUT    /api/cart/items/{product_id}   │
//! │       ▼                           DELETE /api/cart/items/{product_id}   │
//! │  product data for rendering       DELETE /api/cart/items                │
//! │  (quantities stay on the client)       │                                │
//! │                                        ▼                                │
//! │                                   CartView for the x-user-id caller     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every persisted-cart mutation answers with the cart as it is afterwards.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use storefront_core::validation::{validate_id_list, validate_product_id, validate_quantity};
use storefront_core::{CartProduct, CartView};
use tracing::info;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::state::AppState;

/// Body of `POST /api/cart`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProductsRequest {
    pub product_ids: Vec<i64>,
}

/// Body of `POST /api/cart/items`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCartItemRequest {
    pub product_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Body of `PUT /api/cart/items/{product_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

/// `POST /api/cart`
///
/// Product data for a cart the client keeps locally.
pub async fn cart_products(
    State(state): State<AppState>,
    body: Result<Json<CartProductsRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<CartProduct>>> {
    let Json(request) = body?;
    validate_id_list("productIds", &request.product_ids)?;

    let products = state.db.products().cart_products(&request.product_ids).await?;
    Ok(Json(products))
}

/// `GET /api/cart/items`
pub async fn get_cart(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<CartView>> {
    let view = state.db.cart().view(user.id()).await?;
    Ok(Json(view))
}

/// `POST /api/cart/items`
///
/// Increments the line if the product is already in the cart.
pub async fn add_item(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<AddCartItemRequest>, JsonRejection>,
) -> ApiResult<Json<CartView>> {
    let Json(request) = body?;
    validate_product_id(request.product_id)?;
    validate_quantity(request.quantity)?;

    let view = state
        .db
        .cart()
        .add(user.id(), request.product_id, request.quantity)
        .await?;
    Ok(Json(view))
}

/// `PUT /api/cart/items/{product_id}`
pub async fn set_item_quantity(
    State(state): State<AppState>,
    user: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<SetQuantityRequest>, JsonRejection>,
) -> ApiResult<Json<CartView>> {
    let Path(product_id) = path?;
    let Json(request) = body?;
    validate_product_id(product_id)?;
    validate_quantity(request.quantity)?;

    let view = state
        .db
        .cart()
        .set_quantity(user.id(), product_id, request.quantity)
        .await?;
    Ok(Json(view))
}

/// `DELETE /api/cart/items/{product_id}`
pub async fn remove_item(
    State(state): State<AppState>,
    user: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<CartView>> {
    let Path(product_id) = path?;
    validate_product_id(product_id)?;

    let view = state.db.cart().remove(user.id(), product_id).await?;
    Ok(Json(view))
}

/// `DELETE /api/cart/items`
pub async fn clear_cart(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<CartView>> {
    let removed = state.db.cart().clear(user.id()).await?;
    info!(user_id = %user.id(), removed, "Cart cleared");

    Ok(Json(CartView::new(Vec::new())))
}
