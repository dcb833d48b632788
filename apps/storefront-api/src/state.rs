//! Shared application state.

use std::sync::Arc;

use storefront_db::{CheckoutOptions, Database};

use crate::config::ApiConfig;

/// State every handler receives.
///
/// Cheap to clone: the database handle shares one pool and the config sits
/// behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }

    pub fn checkout_options(&self) -> CheckoutOptions {
        self.config.checkout_options()
    }
}
