use chrono::NaiveDate;
use tracing::{error, info};

use crate::errors::AppError;
use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{PricePoint, PriceSeries};

/// Fetches daily history for `ticker` from `start` and validates it into a
/// [`PriceSeries`]. An empty provider result becomes a No-Data error so
/// callers abort before any modeling.
pub async fn fetch_history(
    provider: &dyn PriceProvider,
    ticker: &str,
    start: NaiveDate,
) -> Result<PriceSeries, AppError> {
    let raw = provider
        .fetch_daily_history(ticker, start)
        .await
        .map_err(|e| {
            error!("Failed to fetch price history for {}: {}", ticker, e);
            match e {
                PriceProviderError::RateLimited => AppError::RateLimited,
                other => AppError::External(other.to_string()),
            }
        })?;

    if raw.is_empty() {
        return Err(AppError::NoData(ticker.to_uppercase()));
    }

    let points: Vec<PricePoint> = raw
        .into_iter()
        .map(|p| PricePoint {
            date: p.date,
            close: p.close,
        })
        .collect();

    // A malformed series here means corrupt provider data, not caller error
    let series = PriceSeries::from_points(points).map_err(|e| match e {
        AppError::Validation(msg) => AppError::External(msg),
        other => other,
    })?;
    info!(
        "Fetched {} closes for {} ({} to {})",
        series.len(),
        ticker,
        series.points()[0].date,
        series.last().date
    );

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mock::MockProvider;
    use crate::external::price_provider::ExternalPricePoint;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    struct EmptyProvider;

    #[async_trait]
    impl PriceProvider for EmptyProvider {
        async fn fetch_daily_history(
            &self,
            _ticker: &str,
            _start: NaiveDate,
        ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
            Ok(Vec::new())
        }
    }

    struct DuplicateDatesProvider;

    #[async_trait]
    impl PriceProvider for DuplicateDatesProvider {
        async fn fetch_daily_history(
            &self,
            _ticker: &str,
            _start: NaiveDate,
        ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
            let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
            Ok(vec![
                ExternalPricePoint { date, close: 101.0 },
                ExternalPricePoint { date, close: 102.0 },
            ])
        }
    }

    struct RateLimitedProvider;

    #[async_trait]
    impl PriceProvider for RateLimitedProvider {
        async fn fetch_daily_history(
            &self,
            _ticker: &str,
            _start: NaiveDate,
        ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
            Err(PriceProviderError::RateLimited)
        }
    }

    #[tokio::test]
    async fn test_fetch_history_returns_ascending_series() {
        let provider = MockProvider::new();
        let start = Utc::now().date_naive() - Duration::days(90);

        let series = fetch_history(&provider, "AAPL", start).await.unwrap();
        assert!(series.len() > 50);
        for pair in series.points().windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[tokio::test]
    async fn test_empty_result_is_no_data_error() {
        let result = fetch_history(
            &EmptyProvider,
            "nosuch",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        )
        .await;

        match result {
            Err(AppError::NoData(ticker)) => assert_eq!(ticker, "NOSUCH"),
            other => panic!("expected NoData, got {:?}", other.map(|s| s.len())),
        }
    }

    #[tokio::test]
    async fn test_corrupt_provider_data_is_external_error() {
        let result = fetch_history(
            &DuplicateDatesProvider,
            "AAPL",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        )
        .await;

        // Duplicate dates come from upstream, so the caller is not blamed
        assert!(matches!(result, Err(AppError::External(_))));
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_rate_limited_error() {
        let result = fetch_history(
            &RateLimitedProvider,
            "AAPL",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        )
        .await;
        assert!(matches!(result, Err(AppError::RateLimited)));
    }
}
