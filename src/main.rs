mod app;
mod config;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::external::mock::MockProvider;
use crate::external::multi_provider::MultiProvider;
use crate::external::price_provider::PriceProvider;
use crate::external::stooq::StooqProvider;
use crate::external::twelvedata::TwelveDataProvider;
use crate::logging::LoggingConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Select price provider based on PRICE_PROVIDER env var
    let provider_name =
        std::env::var("PRICE_PROVIDER").unwrap_or_else(|_| "stooq".to_string());

    let provider: Arc<dyn PriceProvider> = match provider_name.to_lowercase().as_str() {
        "stooq" => {
            tracing::info!("Using price provider: Stooq");
            Arc::new(StooqProvider::new())
        }
        "twelvedata" => {
            tracing::info!("Using price provider: Twelve Data");
            Arc::new(
                TwelveDataProvider::from_env()
                    .context("failed to create TwelveDataProvider (check TWELVEDATA_API_KEY)")?,
            )
        }
        "multi" => {
            tracing::info!("Using price provider: Stooq with Twelve Data fallback");
            let primary = Box::new(StooqProvider::new());
            let fallback = Box::new(
                TwelveDataProvider::from_env()
                    .context("failed to create TwelveDataProvider (check TWELVEDATA_API_KEY)")?,
            );
            Arc::new(MultiProvider::new(primary, fallback))
        }
        "mock" => {
            tracing::info!("Using price provider: Mock (deterministic random walk)");
            Arc::new(MockProvider::new())
        }
        other => anyhow::bail!(
            "invalid PRICE_PROVIDER: {}. Must be 'stooq', 'twelvedata', 'multi', or 'mock'",
            other
        ),
    };

    let port = config.port;
    let state = AppState {
        config,
        price_provider: provider,
    };
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("stockcast running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
