use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::external::price_provider::{ExternalPricePoint, PriceProvider, PriceProviderError};

/// Daily history from stooq.com's CSV endpoint. Keyless, so it is the
/// default provider for local runs.
pub struct StooqProvider {
    client: reqwest::Client,
}

impl StooqProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Stooq names US listings with a `.us` suffix. Symbols that already
    /// carry an exchange suffix are passed through unchanged.
    fn normalize_symbol(ticker: &str) -> String {
        let lower = ticker.to_lowercase();
        if lower.contains('.') {
            lower
        } else {
            format!("{}.us", lower)
        }
    }
}

impl Default for StooqProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct StooqRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Close")]
    close: String,
}

#[async_trait]
impl PriceProvider for StooqProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        start: NaiveDate,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
        let url = "https://stooq.com/q/d/l/";
        let symbol = Self::normalize_symbol(ticker);
        let today = Utc::now().date_naive();

        let resp = self
            .client
            .get(url)
            .query(&[
                ("s", symbol.as_str()),
                ("d1", &start.format("%Y%m%d").to_string()),
                ("d2", &today.format("%Y%m%d").to_string()),
                ("i", "d"),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(PriceProviderError::BadResponse(format!(
                "stooq returned HTTP {}",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        // Unknown symbols come back as a plain "No data" body, not an error.
        if body.trim().eq_ignore_ascii_case("no data") {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(body.as_bytes());

        let mut points = Vec::new();
        for row in reader.deserialize::<StooqRow>() {
            let row = row.map_err(|e| PriceProviderError::Parse(e.to_string()))?;

            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
                .map_err(|e| PriceProviderError::Parse(e.to_string()))?;
            let close = row
                .close
                .parse::<f64>()
                .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

            points.push(ExternalPricePoint { date, close });
        }

        // Stooq returns oldest first already; sorting is cheap and keeps
        // the trait contract independent of the endpoint's quirks.
        points.sort_by_key(|p| p.date);

        Ok(points)
    }
}
