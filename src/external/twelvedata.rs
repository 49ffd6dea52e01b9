use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::external::price_provider::{ExternalPricePoint, PriceProvider, PriceProviderError};

/// Daily history from the Twelve Data JSON API. Needs an API key; used as
/// a fallback when the keyless default provider fails.
pub struct TwelveDataProvider {
    client: reqwest::Client,
    api_key: String,
}

impl TwelveDataProvider {
    pub fn from_env() -> Result<Self, PriceProviderError> {
        let api_key = std::env::var("TWELVEDATA_API_KEY")
            .map_err(|_| PriceProviderError::BadResponse("TWELVEDATA_API_KEY not set".into()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    values: Option<Vec<TimeSeriesValue>>,
    status: String,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TimeSeriesValue {
    datetime: String,
    close: String,
}

/// Turns a decoded API body into ascending price points. Rate-limit
/// messages become `RateLimited`, unknown-symbol messages an empty result,
/// and anything else a bad response. Twelve Data returns newest first, so
/// the values are reversed.
fn interpret_response(
    body: TimeSeriesResponse,
) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
    if body.status != "ok" {
        if let Some(msg) = body.message {
            if msg.contains("API rate limit") || msg.contains("credits") {
                return Err(PriceProviderError::RateLimited);
            }
            // "symbol not found" style messages mean no data, not failure
            if msg.contains("not found") || msg.contains("**symbol**") {
                return Ok(Vec::new());
            }
            return Err(PriceProviderError::BadResponse(msg));
        }
        return Err(PriceProviderError::BadResponse(format!(
            "API returned status: {}",
            body.status
        )));
    }

    let values = body
        .values
        .ok_or_else(|| PriceProviderError::BadResponse("missing values in response".into()))?;

    let mut points = values
        .into_iter()
        .map(|v| -> Result<ExternalPricePoint, PriceProviderError> {
            // Twelve Data returns "YYYY-MM-DD" or "YYYY-MM-DD HH:MM:SS"
            let date_part = v
                .datetime
                .split(' ')
                .next()
                .ok_or_else(|| PriceProviderError::Parse("empty datetime".into()))?;
            let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

            let close = v
                .close
                .parse::<f64>()
                .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

            Ok(ExternalPricePoint { date, close })
        })
        .collect::<Result<Vec<_>, _>>()?;

    points.reverse();

    Ok(points)
}

#[async_trait]
impl PriceProvider for TwelveDataProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        start: NaiveDate,
    ) -> Result<Vec<ExternalPricePoint>, PriceProviderError> {
        let url = "https://api.twelvedata.com/time_series";

        let resp = self
            .client
            .get(url)
            .query(&[
                ("symbol", ticker),
                ("interval", "1day"),
                ("start_date", &start.format("%Y-%m-%d").to_string()),
                ("outputsize", "5000"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let body: TimeSeriesResponse = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        interpret_response(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(datetime: &str, close: &str) -> TimeSeriesValue {
        TimeSeriesValue {
            datetime: datetime.to_string(),
            close: close.to_string(),
        }
    }

    fn error_body(message: &str) -> TimeSeriesResponse {
        TimeSeriesResponse {
            values: None,
            status: "error".to_string(),
            message: Some(message.to_string()),
        }
    }

    #[test]
    fn test_newest_first_values_are_reversed() {
        let body = TimeSeriesResponse {
            values: Some(vec![
                value("2024-01-03", "103.0"),
                value("2024-01-02", "102.0"),
                value("2024-01-01", "101.0"),
            ]),
            status: "ok".to_string(),
            message: None,
        };

        let points = interpret_response(body).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(points[0].close, 101.0);
        assert_eq!(points[2].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(points[2].close, 103.0);
    }

    #[test]
    fn test_datetime_with_time_component_parses() {
        let body = TimeSeriesResponse {
            values: Some(vec![value("2024-01-05 00:00:00", "110.5")]),
            status: "ok".to_string(),
            message: None,
        };

        let points = interpret_response(body).unwrap();
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn test_rate_limit_message_maps_to_rate_limited() {
        let body = error_body("You have run out of API credits for the current minute");
        assert!(matches!(
            interpret_response(body),
            Err(PriceProviderError::RateLimited)
        ));

        let body = error_body("API rate limit exceeded");
        assert!(matches!(
            interpret_response(body),
            Err(PriceProviderError::RateLimited)
        ));
    }

    #[test]
    fn test_unknown_symbol_message_is_empty_result() {
        let body = error_body("**symbol** not found: ZZZZ. Please specify it correctly");
        let points = interpret_response(body).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_other_error_message_is_bad_response() {
        let body = error_body("Invalid API key");
        match interpret_response(body) {
            Err(PriceProviderError::BadResponse(msg)) => assert_eq!(msg, "Invalid API key"),
            other => panic!("expected BadResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_error_status_without_message_is_bad_response() {
        let body = TimeSeriesResponse {
            values: None,
            status: "error".to_string(),
            message: None,
        };
        assert!(matches!(
            interpret_response(body),
            Err(PriceProviderError::BadResponse(_))
        ));
    }

    #[test]
    fn test_ok_status_without_values_is_bad_response() {
        let body = TimeSeriesResponse {
            values: None,
            status: "ok".to_string(),
            message: None,
        };
        assert!(matches!(
            interpret_response(body),
            Err(PriceProviderError::BadResponse(_))
        ));
    }

    #[test]
    fn test_unparseable_close_is_parse_error() {
        let body = TimeSeriesResponse {
            values: Some(vec![value("2024-01-05", "n/a")]),
            status: "ok".to_string(),
            message: None,
        };
        assert!(matches!(
            interpret_response(body),
            Err(PriceProviderError::Parse(_))
        ));
    }
}
