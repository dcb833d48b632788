//! # Product Handlers
//!
//! Catalog reads for everyone, product writes for admins.
//!
//! ## Admin Upload Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Upload                                       │
//! │                                                                         │
//! │  Admin page uploads the image to file storage (outside this server)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  POST /api/products { name, price_cents, category_id,                  │
//! │                       image_file_name, ... }                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AdminUser extractor ── not admin ──► 403                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate fields ── bad ──► 400                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  image_url = {IMAGE_BASE_URL}/{image_file_name}                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT products ── category missing ──► 404                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  { "success": true, "product": { ... } }                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use storefront_core::validation::{
    validate_description, validate_id, validate_id_list, validate_image_file_name,
    validate_price_cents, validate_product_id, validate_product_name, validate_stock,
    MAX_ID_LIST_LEN,
};
use storefront_core::{
    NewProduct, PriceListing, Product, ProductListing, ProductPatch, ValidationError,
};
use tracing::{debug, info};

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Body of `POST /api/products/by-id` and `POST /api/products/by-ids`.
#[derive(Debug, Clone, Deserialize)]
pub struct IdsRequest {
    pub ids: Vec<i64>,
}

/// Body of `POST /api/products`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i64,
    pub category_id: i64,
    /// File name of the image already written to file storage.
    pub image_file_name: String,
}

impl NewProductRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_product_name(&self.name)?;
        validate_description(&self.description)?;
        validate_price_cents(self.price_cents)?;
        validate_stock(self.stock)?;
        validate_id("category_id", self.category_id)?;
        validate_image_file_name(&self.image_file_name)?;
        Ok(())
    }
}

/// Body of `PUT /api/products/{id}`. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub category_id: Option<i64>,
    pub image_file_name: Option<String>,
}

impl UpdateProductRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_product_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(price) = self.price_cents {
            validate_price_cents(price)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        if let Some(category_id) = self.category_id {
            validate_id("category_id", category_id)?;
        }
        if let Some(file_name) = &self.image_file_name {
            validate_image_file_name(file_name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedProduct {
    pub success: bool,
    pub product: Product,
}

/// `GET /api/products/fetch`
///
/// Every product, newest first, in listing form.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<ProductListing>>> {
    let products = state.db.products().list_newest().await?;
    debug!(count = products.len(), "Listing products");

    Ok(Json(products.iter().map(ProductListing::from).collect()))
}

/// `GET /api/products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = path?;
    validate_product_id(id)?;

    state
        .db
        .products()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// `POST /api/products/by-id`
///
/// Full records for a non-empty list of positive ids. Unknown ids are
/// skipped.
pub async fn products_by_id(
    State(state): State<AppState>,
    body: Result<Json<IdsRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<Product>>> {
    let Json(request) = body?;
    validate_id_list("ids", &request.ids)?;

    let products = state.db.products().get_many(&request.ids).await?;
    Ok(Json(products))
}

/// `POST /api/products/by-ids`
///
/// Legacy `(id, name, price)` lookup. An empty list yields an empty array.
pub async fn price_listings(
    State(state): State<AppState>,
    body: Result<Json<IdsRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<PriceListing>>> {
    let Json(request) = body?;

    if request.ids.len() > MAX_ID_LIST_LEN {
        return Err(ValidationError::OutOfRange {
            field: "ids".to_string(),
            min: 0,
            max: MAX_ID_LIST_LEN as i64,
        }
        .into());
    }

    let listings = state.db.products().price_listings(&request.ids).await?;
    Ok(Json(listings))
}

/// `POST /api/products` (admin)
pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    body: Result<Json<NewProductRequest>, JsonRejection>,
) -> ApiResult<Json<CreatedProduct>> {
    let Json(request) = body?;
    request.validate()?;

    let new_product = NewProduct {
        name: request.name.trim().to_string(),
        description: request.description,
        price_cents: request.price_cents,
        stock: request.stock,
        category_id: request.category_id,
        image_url: state.config.image_url(request.image_file_name.trim()),
    };

    let product = state.db.products().insert(&new_product).await?;

    info!(
        product_id = product.id,
        admin_id = %admin.id,
        price_cents = product.price_cents,
        "Product created"
    );

    Ok(Json(CreatedProduct {
        success: true,
        product,
    }))
}

/// `PUT /api/products/{id}` (admin)
///
/// Existing order lines keep the price they were bought at.
pub async fn update_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = path?;
    let Json(request) = body?;
    validate_product_id(id)?;
    request.validate()?;

    let patch = ProductPatch {
        name: request.name.map(|n| n.trim().to_string()),
        description: request.description,
        price_cents: request.price_cents,
        stock: request.stock,
        category_id: request.category_id,
        image_url: request
            .image_file_name
            .map(|f| state.config.image_url(f.trim())),
    };

    if patch.is_empty() {
        return Err(ApiError::validation("No fields to update"));
    }

    let product = state.db.products().update(id, &patch).await?;

    info!(product_id = id, admin_id = %admin.id, "Product updated");
    Ok(Json(product))
}
