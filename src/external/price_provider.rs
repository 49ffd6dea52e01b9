use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// Raw daily close as returned by a provider, before series validation.
#[derive(Debug, Clone, Copy)]
pub struct ExternalPricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches daily closing prices for `ticker` from `start` up to the
    /// most recent available trading day. Implementations return points in
    /// ascending date order; an empty vec means the symbol has no data.
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        start: NaiveDate,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError>;
}
