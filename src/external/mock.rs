use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::external::price_provider::{ExternalPricePoint, PriceProvider, PriceProviderError};

/// Generates a deterministic random walk instead of calling a real API.
/// Used in tests and for keyless demo runs. Weekends are skipped so the
/// data has the gap structure of real trading days.
pub struct MockProvider;

impl MockProvider {
    pub fn new() -> Self {
        Self
    }

    // Same ticker, same walk, so assertions on forecasts are stable.
    fn seed_for(ticker: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        ticker.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceProvider for MockProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        start: NaiveDate,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
        let today = Utc::now().date_naive();
        if start > today {
            return Ok(Vec::new());
        }

        let mut rng = StdRng::seed_from_u64(Self::seed_for(ticker));
        let mut points = Vec::new();
        let mut current = 100.0_f64;
        let mut date = start;

        while date <= today {
            let weekday = date.weekday();
            if weekday != Weekday::Sat && weekday != Weekday::Sun {
                current *= 1.0 + (rng.random::<f64>() - 0.5) * 0.02;
                points.push(ExternalPricePoint { date, close: current });
            }
            date = date + Duration::days(1);
        }

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_walk_is_deterministic_per_ticker() {
        let provider = MockProvider::new();
        let start = Utc::now().date_naive() - Duration::days(60);

        let a = provider.fetch_daily_history("AAPL", start).await.unwrap();
        let b = provider.fetch_daily_history("AAPL", start).await.unwrap();
        assert_eq!(a.len(), b.len());
        assert_eq!(a.first().unwrap().close, b.first().unwrap().close);
        assert_eq!(a.last().unwrap().close, b.last().unwrap().close);
    }

    #[tokio::test]
    async fn test_weekends_are_skipped() {
        let provider = MockProvider::new();
        let start = Utc::now().date_naive() - Duration::days(30);

        let points = provider.fetch_daily_history("TSLA", start).await.unwrap();
        assert!(points
            .iter()
            .all(|p| p.date.weekday() != Weekday::Sat && p.date.weekday() != Weekday::Sun));
    }

    #[tokio::test]
    async fn test_future_start_yields_no_data() {
        let provider = MockProvider::new();
        let start = Utc::now().date_naive() + Duration::days(7);

        let points = provider.fetch_daily_history("AAPL", start).await.unwrap();
        assert!(points.is_empty());
    }
}
