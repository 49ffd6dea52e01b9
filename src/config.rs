use chrono::NaiveDate;

/// Process configuration, read once at startup. Requests only ever see an
/// immutable reference; there is no state that persists between runs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Earliest date fetched from the price provider.
    pub history_start: NaiveDate,
}

const DEFAULT_HISTORY_START: &str = "2020-01-01";

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("invalid PORT: {}", e))?;

        let history_start = std::env::var("HISTORY_START")
            .unwrap_or_else(|_| DEFAULT_HISTORY_START.to_string());
        let history_start = NaiveDate::parse_from_str(&history_start, "%Y-%m-%d")
            .map_err(|e| format!("invalid HISTORY_START (want YYYY-MM-DD): {}", e))?;

        Ok(Self { port, history_start })
    }
}
