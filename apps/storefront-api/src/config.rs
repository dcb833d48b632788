//! Storefront API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use storefront_core::checkout::UnknownProductPolicy;
use storefront_db::{CheckoutMode, CheckoutOptions, DbConfig};

/// Public bucket the admin upload flow writes product images to.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://storage.storefront.test/product-images";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

/// Storefront API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface the HTTP listener binds to
    pub http_host: String,

    /// HTTP listener port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Whether checkout wraps its inserts in one transaction
    pub checkout_mode: CheckoutMode,

    /// What checkout does with product ids missing from the catalog
    pub unknown_product_policy: UnknownProductPolicy,

    /// Prefix joined with an uploaded image's file name
    pub image_base_url: String,

    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            database_path: PathBuf::from("./storefront.db"),
            db_max_connections: 5,
            checkout_mode: CheckoutMode::default(),
            unknown_product_policy: UnknownProductPolicy::default(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./storefront.db")),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            checkout_mode: env::var("CHECKOUT_MODE")
                .unwrap_or_else(|_| "transactional".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CHECKOUT_MODE".to_string()))?,

            unknown_product_policy: env::var("UNKNOWN_PRODUCT_POLICY")
                .unwrap_or_else(|_| "zero_price".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("UNKNOWN_PRODUCT_POLICY".to_string()))?,

            image_base_url: env::var("IMAGE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_BASE_URL.to_string()),

            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LOG_FORMAT".to_string()))?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        let base = self.image_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue("IMAGE_BASE_URL".to_string()));
        }

        Ok(())
    }

    /// Socket address for the HTTP listener.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.http_host, self.http_port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("HTTP_HOST".to_string()))
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone()).max_connections(self.db_max_connections)
    }

    pub fn checkout_options(&self) -> CheckoutOptions {
        CheckoutOptions {
            mode: self.checkout_mode,
            unknown_products: self.unknown_product_policy,
        }
    }

    /// Public URL of an uploaded image.
    pub fn image_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.image_base_url.trim_end_matches('/'), file_name)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
