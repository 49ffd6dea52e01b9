use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::PricePoint;

/// Single point in a forecast time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_price: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Which segment of the combined series a point belongs to, so a renderer
/// can color or annotate history and forecast differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Historical,
    Forecast,
}

/// One point of the display series: history followed by forecast, with the
/// two segments kept distinguishable. Never merged or deduplicated by date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub segment: Segment,
}

/// Row of the forecast table, dates pre-formatted as `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRow {
    pub date: String,
    pub predicted_price: f64,
}

/// Complete forecast for one run: everything the display layer needs.
#[derive(Debug, Clone, Serialize)]
pub struct StockForecast {
    pub run_id: Uuid,
    pub ticker: String,
    pub horizon_days: u32,
    /// Most recent historical rows, for the preview table.
    pub recent_history: Vec<PricePoint>,
    /// History followed by forecast, segment-tagged for charting.
    pub combined: Vec<CombinedPoint>,
    pub forecast_table: Vec<ForecastRow>,
    pub generated_at: DateTime<Utc>,
}
