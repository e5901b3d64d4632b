//! marketscoped — Marketscope analysis daemon.
//!
//! Serves the analysis endpoints over HTTP for the dashboard.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use marketscope::providers::openai::DEFAULT_BASE_URL;
use marketscope::server::config::{Config, Secrets};
use marketscope::server::{AppState, create_router};
use marketscope::{AnalysisService, MarketscopeError, OpenAiClient};

/// Marketscope daemon — templated market-analysis generation service.
#[derive(Parser)]
#[command(name = "marketscoped")]
#[command(version = marketscope::PKG_VERSION)]
#[command(about = "Marketscope analysis daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address from the configuration file.
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load and check configuration before touching the network
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(address) = args.address {
        config.server.address = address;
    }
    config.validate()?;

    // A missing key is fatal: never serve in a mode where every request fails
    let api_key = Secrets::load()?.require_api_key()?;

    let service = build_service(&config, api_key)?;
    let addr: SocketAddr = config
        .server
        .address
        .parse()
        .map_err(|e| MarketscopeError::Configuration(format!("Invalid address: {e}")))?;

    info!(
        version = marketscope::version_string(),
        %addr,
        model = service.model(),
        "marketscoped starting"
    );

    let state = AppState::new(Arc::new(service)).with_request_timeout(config.request_timeout());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}

/// Build the [`AnalysisService`] from configuration.
fn build_service(config: &Config, api_key: String) -> Result<AnalysisService, MarketscopeError> {
    let generation = &config.generation;
    let base_url = generation.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
    // Transport timeout matches the attempt timeout so both report the same ceiling
    let http_timeout = Duration::from_millis(generation.timeout_ms);
    let client = OpenAiClient::with_timeout(api_key, base_url, http_timeout)?;

    AnalysisService::builder()
        .provider(Arc::new(client))
        .options(generation.options())
        .retry(generation.retry())
        .build()
}
