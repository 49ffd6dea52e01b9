use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// One observed daily close for a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Historical closing prices in ascending date order.
///
/// Invariants: dates strictly increasing, no duplicate dates, never empty.
/// Construction goes through [`PriceSeries::from_points`], which sorts raw
/// provider output and rejects anything that violates the invariants, so
/// downstream code can rely on `last()` being the newest observation.
#[derive(Debug, Clone, Serialize)]
pub struct PriceSeries(Vec<PricePoint>);

impl PriceSeries {
    /// Builds a series from provider output in arbitrary order.
    pub fn from_points(mut points: Vec<PricePoint>) -> Result<Self, AppError> {
        if points.is_empty() {
            return Err(AppError::Validation(
                "price series must contain at least one observation".to_string(),
            ));
        }

        points.sort_by_key(|p| p.date);

        for pair in points.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(AppError::Validation(format!(
                    "duplicate date {} in price series",
                    pair[0].date
                )));
            }
        }

        Ok(Self(points))
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Newest observation. Safe because the series is never empty.
    pub fn last(&self) -> &PricePoint {
        self.0.last().expect("PriceSeries is never empty")
    }

    pub fn closes(&self) -> Vec<f64> {
        self.0.iter().map(|p| p.close).collect()
    }

    /// The most recent `n` rows, oldest first.
    pub fn tail(&self, n: usize) -> Vec<PricePoint> {
        let start = self.0.len().saturating_sub(n);
        self.0[start..].to_vec()
    }
}
