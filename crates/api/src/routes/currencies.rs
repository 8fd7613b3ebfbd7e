//! Currency and exchange rate routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use kur_core::currency::{Currency, CurrencyError, ExchangeRateInfo};
use kur_shared::AppError;
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

/// Creates the currency routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/currency", get(list_currencies))
        .route("/currency/exchange-rate", get(get_exchange_rate))
        .route("/currency/refresh", post(refresh_currencies))
        .route("/currency/{code}", get(get_currency))
}

/// Query parameters for an exchange rate lookup.
#[derive(Debug, Deserialize)]
pub struct ExchangeRateQuery {
    /// Source currency code.
    pub from: Option<String>,
    /// Target currency code.
    pub to: Option<String>,
}

/// Response for a forced refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// Number of currencies in the new rate set, base currency included.
    pub count: usize,
    /// Fetch time of the new rate set.
    pub last_updated: Option<DateTime<Utc>>,
}

/// GET `/currency` - List every currency in the current rate set.
async fn list_currencies(State(state): State<AppState>) -> Json<Vec<Currency>> {
    Json(state.currency_service.list_all().await)
}

/// GET `/currency/{code}` - Get one currency by code.
async fn get_currency(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Currency>, ApiError> {
    state
        .currency_service
        .get_by_code(&code)
        .await
        .map(Json)
        .ok_or_else(|| CurrencyError::NotFound(code).into())
}

/// GET `/currency/exchange-rate?from=&to=` - Cross rate between two currencies.
async fn get_exchange_rate(
    State(state): State<AppState>,
    Query(query): Query<ExchangeRateQuery>,
) -> Result<Json<ExchangeRateInfo>, ApiError> {
    let from = required(query.from, "from")?;
    let to = required(query.to, "to")?;

    let info = state.currency_service.get_exchange_rate(&from, &to).await?;
    Ok(Json(info))
}

/// POST `/currency/refresh` - Refetch the rate sheet and replace the cache.
async fn refresh_currencies(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let currencies = state.currency_service.force_refresh().await?;

    Ok(Json(RefreshResponse {
        count: currencies.len(),
        last_updated: currencies.first().map(|c| c.last_updated),
    }))
}

fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("Query parameter '{name}' is required")).into())
}
