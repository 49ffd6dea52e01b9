use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::PricePoint;
use crate::services::price_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:ticker", get(get_prices))
}

pub async fn get_prices(
    Path(ticker): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PricePoint>>, AppError> {
    info!("GET /prices/{} - Getting price history", ticker);
    let series = price_service::fetch_history(
        state.price_provider.as_ref(),
        &ticker,
        state.config.history_start,
    )
    .await
    .map_err(|e| {
        error!("Failed to get price history for {}: {}", ticker, e);
        e
    })?;
    Ok(Json(series.points().to_vec()))
}
