//! # Storefront API
//!
//! JSON HTTP server for the storefront: catalog, cart, checkout, users and
//! order history.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront API Server                            │
//! │                                                                         │
//! │  Web client ───► HTTP (8080) ───► axum Router ───► Handlers            │
//! │                      │                                 │                │
//! │                      ▼                                 ▼                │
//! │              TraceLayer, CORS               storefront-db (SQLite)      │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                                             storefront-core rules       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_HOST` - Listener interface (default: 0.0.0.0)
//! - `HTTP_PORT` - Listener port (default: 8080)
//! - `DATABASE_PATH` - SQLite file (default: ./storefront.db)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `CHECKOUT_MODE` - `transactional` (default) or `sequential`
//! - `UNKNOWN_PRODUCT_POLICY` - `zero_price` (default) or `reject`
//! - `IMAGE_BASE_URL` - Public URL prefix of uploaded product images
//! - `LOG_FORMAT` - `pretty` (default) or `json`
//! - `RUST_LOG` - Log filter (default: storefront=info,tower_http=info)

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-exports
pub use config::{ApiConfig, ConfigError, LogFormat};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::router;
pub use state::AppState;
