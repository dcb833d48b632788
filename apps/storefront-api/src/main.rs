//! # Storefront API Server
//!
//! Process entry point: logging, configuration, database, HTTP listener.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use storefront_api::{router, ApiConfig, AppState, LogFormat};
use storefront_db::Database;

const DEFAULT_LOG_FILTER: &str = "storefront=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first: it picks the log format
    let config = ApiConfig::load()?;

    init_tracing(config.log_format);

    info!("Starting Storefront API server...");
    info!(
        port = config.http_port,
        database = %config.database_path.display(),
        checkout_mode = %config.checkout_mode,
        unknown_products = %config.unknown_product_policy,
        "Configuration loaded"
    );

    // Connect to database (runs migrations)
    let db = Database::new(config.db_config()).await?;
    info!("Database ready");

    let addr = config.listen_addr()?;
    let state = AppState::new(db.clone(), config);
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
