use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use flightdeck::agent::Agent;
use flightdeck::flights::client::AviationstackConfig;
use flightdeck::flights::FlightSystem;
use flightdeck::providers::configs::{OpenRouterProviderConfig, DEFAULT_MODEL};
use flightdeck::providers::openrouter::OpenRouterProvider;

mod session;

#[derive(Parser)]
#[command(author, version, about = "Chat assistant for flight search and status", long_about = None)]
struct Cli {
    /// OpenRouter API key (can also be set via OPENROUTER_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Aviationstack API key (can also be set via CLIENTSECRET)
    #[arg(long)]
    flight_api_key: Option<String>,

    /// Model to use
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env for local dev before any secret lookup
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // A missing chat provider credential is fatal here, before any
    // provider call is attempted
    let provider_config = match cli.api_key {
        Some(api_key) => OpenRouterProviderConfig::new(api_key, cli.model),
        None => {
            let mut config = OpenRouterProviderConfig::from_env()?;
            config.model = cli.model;
            config
        }
    };
    let provider = OpenRouterProvider::new(provider_config)?;

    // A missing flight credential degrades to an in-band tool error,
    // so the session still starts
    let mut flight_config = AviationstackConfig::from_env();
    if let Some(key) = cli.flight_api_key {
        flight_config.api_key = Some(key);
    }

    let mut agent = Agent::new(Box::new(provider));
    agent.add_system(Box::new(FlightSystem::new(flight_config)?));

    let mut session = session::Session::new(agent);
    session.start().await
}
