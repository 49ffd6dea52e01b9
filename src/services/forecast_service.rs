use chrono::{Duration, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::{
    CombinedPoint, ForecastPoint, ForecastRow, PriceSeries, Segment, StockForecast,
};
use crate::services::price_service;
use crate::services::seasonal_model::FittedSeasonalAr;

pub const MIN_HORIZON_DAYS: u32 = 7;
pub const MAX_HORIZON_DAYS: u32 = 90;
pub const DEFAULT_HORIZON_DAYS: u32 = 30;

/// Rows of history shown in the preview table.
const RECENT_ROWS: usize = 5;

/// Runs one full forecast pass: fetch, fit, project, combine. Everything
/// here is constructed fresh per call and dropped with the response; no
/// state survives between runs.
pub async fn assemble(
    provider: &dyn PriceProvider,
    config: &AppConfig,
    ticker: &str,
    horizon_days: u32,
) -> Result<StockForecast, AppError> {
    validate_horizon(horizon_days)?;

    // Empty history aborts the run here, before any model fitting.
    let history = price_service::fetch_history(provider, ticker, config.history_start).await?;

    info!(
        "Forecasting {} days for {} from {} observations",
        horizon_days,
        ticker,
        history.len()
    );

    let model = FittedSeasonalAr::fit(&history.closes())
        .map_err(|e| AppError::Forecast(e.to_string()))?;
    let raw_forecast = model.forecast(horizon_days as usize);

    let index = build_forward_index(history.last().date, horizon_days);
    let forecast = attach_forecast(&index, &raw_forecast, model.residual_std())?;
    let combined = combine_for_display(&history, &forecast);

    Ok(StockForecast {
        run_id: Uuid::new_v4(),
        ticker: ticker.to_uppercase(),
        horizon_days,
        recent_history: history.tail(RECENT_ROWS),
        combined,
        forecast_table: forecast_table(&forecast),
        generated_at: Utc::now(),
    })
}

pub fn validate_horizon(horizon_days: u32) -> Result<(), AppError> {
    if !(MIN_HORIZON_DAYS..=MAX_HORIZON_DAYS).contains(&horizon_days) {
        return Err(AppError::Validation(format!(
            "Forecast horizon must be between {} and {} days, got {}",
            MIN_HORIZON_DAYS, MAX_HORIZON_DAYS, horizon_days
        )));
    }
    Ok(())
}

/// Consecutive calendar dates for the forecast, starting the day after the
/// last observation. Daily frequency with no gap-filling for non-trading
/// days, matching the horizon exactly.
pub fn build_forward_index(last_date: NaiveDate, horizon_days: u32) -> Vec<NaiveDate> {
    (1..=i64::from(horizon_days))
        .map(|offset| last_date + Duration::days(offset))
        .collect()
}

/// Pairs raw model output with the forward index positionally. The model
/// is expected to return exactly one value per index date; a mismatch is a
/// precondition failure and produces no partial series.
pub fn attach_forecast(
    index: &[NaiveDate],
    values: &[f64],
    residual_std: f64,
) -> Result<Vec<ForecastPoint>, AppError> {
    if index.len() != values.len() {
        return Err(AppError::Forecast(format!(
            "model returned {} values for a {}-day horizon",
            values.len(),
            index.len()
        )));
    }

    Ok(index
        .iter()
        .zip(values.iter())
        .enumerate()
        .map(|(i, (&date, &predicted_price))| {
            // 95% interval widening with the square root of the step count
            let half_width = 1.96 * residual_std * ((i + 1) as f64).sqrt();
            ForecastPoint {
                date,
                predicted_price,
                lower_bound: (predicted_price - half_width).max(0.0),
                upper_bound: predicted_price + half_width,
            }
        })
        .collect())
}

/// History followed by forecast, each point tagged with its segment so the
/// renderer can style them differently. No deduplication or interpolation;
/// forecast dates start strictly after the last historical date.
pub fn combine_for_display(history: &PriceSeries, forecast: &[ForecastPoint]) -> Vec<CombinedPoint> {
    let mut combined: Vec<CombinedPoint> = history
        .points()
        .iter()
        .map(|p| CombinedPoint {
            date: p.date,
            price: p.close,
            segment: Segment::Historical,
        })
        .collect();

    combined.extend(forecast.iter().map(|p| CombinedPoint {
        date: p.date,
        price: p.predicted_price,
        segment: Segment::Forecast,
    }));

    combined
}

fn forecast_table(forecast: &[ForecastPoint]) -> Vec<ForecastRow> {
    forecast
        .iter()
        .map(|p| ForecastRow {
            date: p.date.format("%Y-%m-%d").to_string(),
            predicted_price: p.predicted_price,
        })
        .collect()
}
