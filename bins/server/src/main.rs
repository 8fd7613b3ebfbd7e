//! Kur API Server
//!
//! Main entry point for the exchange rate service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kur_api::{AppState, create_router};
use kur_core::currency::CurrencyService;
use kur_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kur=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Create currency service
    let currency_service = CurrencyService::from_config(&config.currency)
        .context("Failed to create currency service")?;
    info!(
        feed_url = %config.currency.feed_url,
        cache_key = %config.currency.cache_key,
        cache_minutes = config.currency.cache_duration_minutes,
        timeout_secs = config.currency.request_timeout_secs,
        "Currency service configured"
    );

    // Create router
    let app = create_router(AppState::new(currency_service));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
