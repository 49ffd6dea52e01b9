use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    /// Historical retrieval returned nothing for the symbol. The run halts
    /// before any model fitting.
    #[error("No data found for ticker {0}")]
    NoData(String),
    /// Model construction, fitting, or forecasting failed. Caught at the
    /// assembler boundary; the run ends without partial output.
    #[error("Forecasting failed: {0}")]
    Forecast(String),
    #[error("Rate limited by external provider")]
    RateLimited,
    #[error("External error: {0}")]
    External(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::NoData(ticker) => (
                StatusCode::NOT_FOUND,
                format!("No data found for ticker {}. Please check the symbol and try again.", ticker),
            )
                .into_response(),
            AppError::Forecast(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Forecasting failed: {}", msg),
            )
                .into_response(),
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (StatusCode::TOO_MANY_REQUESTS, headers, "Rate limited").into_response()
            }
            AppError::External(msg) => (StatusCode::BAD_GATEWAY, msg).into_response(),
        }
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::Validation(value)
    }
}
