use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::warn;

use crate::external::price_provider::{ExternalPricePoint, PriceProvider, PriceProviderError};

/// Tries the primary provider first and falls back to the secondary on any
/// failure. Rate limiting from the primary is worth falling back on too,
/// since the secondary has its own quota.
pub struct MultiProvider {
    primary: Box<dyn PriceProvider>,
    fallback: Box<dyn PriceProvider>,
}

impl MultiProvider {
    pub fn new(primary: Box<dyn PriceProvider>, fallback: Box<dyn PriceProvider>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl PriceProvider for MultiProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        start: NaiveDate,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
        match self.primary.fetch_daily_history(ticker, start).await {
            Ok(points) => Ok(points),
            Err(e) => {
                warn!("Primary provider failed for {}: {}. Trying fallback", ticker, e);
                self.fallback.fetch_daily_history(ticker, start).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mock::MockProvider;

    struct FailingProvider;

    #[async_trait]
    impl PriceProvider for FailingProvider {
        async fn fetch_daily_history(
            &self,
            _ticker: &str,
            _start: NaiveDate,
        ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
            Err(PriceProviderError::Network("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_falls_back_when_primary_fails() {
        let provider = MultiProvider::new(
            Box::new(FailingProvider),
            Box::new(MockProvider::new()),
        );
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let points = provider.fetch_daily_history("AAPL", start).await.unwrap();
        assert!(!points.is_empty());
    }

    #[tokio::test]
    async fn test_primary_result_used_when_it_succeeds() {
        let provider = MultiProvider::new(
            Box::new(MockProvider::new()),
            Box::new(FailingProvider),
        );
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        assert!(provider.fetch_daily_history("AAPL", start).await.is_ok());
    }

    #[tokio::test]
    async fn test_error_surfaces_when_both_fail() {
        let provider = MultiProvider::new(Box::new(FailingProvider), Box::new(FailingProvider));
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        assert!(provider.fetch_daily_history("AAPL", start).await.is_err());
    }
}
