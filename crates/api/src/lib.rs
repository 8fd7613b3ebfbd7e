//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes
//! - Error to response mapping

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use kur_core::currency::CurrencyService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Currency lookups and cross-rates.
    pub currency_service: Arc<CurrencyService>,
}

impl AppState {
    /// Creates state around a currency service.
    pub fn new(currency_service: CurrencyService) -> Self {
        Self {
            currency_service: Arc::new(currency_service),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
