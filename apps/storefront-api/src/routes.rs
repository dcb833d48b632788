//! # Router
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /api                                                                   │
//! │  ├── GET    /health                                                     │
//! │  ├── GET    /products/fetch                                             │
//! │  ├── GET    /products/{id}                                              │
//! │  ├── POST   /products/by-id                                             │
//! │  ├── POST   /products/by-ids                                            │
//! │  ├── POST   /products                      (admin)                      │
//! │  ├── PUT    /products/{id}                 (admin)                      │
//! │  ├── GET    /categories                                                 │
//! │  ├── POST   /cart                                                       │
//! │  ├── GET    /cart/items                    (x-user-id)                  │
//! │  ├── POST   /cart/items                    (x-user-id)                  │
//! │  ├── DELETE /cart/items                    (x-user-id)                  │
//! │  ├── PUT    /cart/items/{product_id}       (x-user-id)                  │
//! │  ├── DELETE /cart/items/{product_id}       (x-user-id)                  │
//! │  ├── POST   /checkout                                                   │
//! │  ├── GET    /profile                       (x-user-id)                  │
//! │  ├── GET    /users/me                      (x-user-id)                  │
//! │  └── PUT    /users/me                      (x-user-id)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ErrorCode};
use crate::handlers::{cart, categories, checkout, health, products, profile, users};
use crate::state::AppState;

/// Builds the application router with tracing and CORS layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/products", post(products::create_product))
        .route("/products/fetch", get(products::list_products))
        .route("/products/by-id", post(products::products_by_id))
        .route("/products/by-ids", post(products::price_listings))
        .route(
            "/products/{id}",
            get(products::get_product).put(products::update_product),
        )
        .route("/categories", get(categories::list_categories))
        .route("/cart", post(cart::cart_products))
        .route(
            "/cart/items",
            get(cart::get_cart)
                .post(cart::add_item)
                .delete(cart::clear_cart),
        )
        .route(
            "/cart/items/{product_id}",
            put(cart::set_item_quantity).delete(cart::remove_item),
        )
        .route("/checkout", post(checkout::checkout))
        .route("/profile", get(profile::order_history))
        .route("/users/me", get(users::get_me).put(users::upsert_me))
}

async fn not_found() -> ApiError {
    ApiError::new(ErrorCode::NotFound, "No such endpoint")
}
