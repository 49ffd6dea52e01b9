use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::StockForecast;
use crate::services::forecast_service::{self, DEFAULT_HORIZON_DAYS};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:ticker", get(get_forecast))
}

#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    pub horizon: Option<u32>,
}

pub async fn get_forecast(
    Path(ticker): Path<String>,
    Query(params): Query<ForecastParams>,
    State(state): State<AppState>,
) -> Result<Json<StockForecast>, AppError> {
    let horizon = params.horizon.unwrap_or(DEFAULT_HORIZON_DAYS);
    info!("GET /forecast/{} - Forecasting {} days", ticker, horizon);

    let forecast = forecast_service::assemble(
        state.price_provider.as_ref(),
        &state.config,
        &ticker,
        horizon,
    )
    .await
    .map_err(|e| {
        match &e {
            AppError::RateLimited => warn!("Rate limited while forecasting {}", ticker),
            _ => error!("Failed to forecast {}: {}", ticker, e),
        }
        e
    })?;

    Ok(Json(forecast))
}
