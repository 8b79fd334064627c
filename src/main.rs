//! SIT ledger HTTP service.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use sit_ledger::api::{AppState, create_router};
use sit_ledger::config::ConfigLoader;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sit-ledger",
    about = "Serve the storage-in-transit day ledger and extension review API",
    version
)]
struct Cli {
    /// Directory containing policy.yaml
    #[arg(long, default_value = "./config/sit")]
    config: PathBuf,
    /// Host for the HTTP server
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Port for the HTTP server
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(log_level: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init()?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = ConfigLoader::load(&cli.config)?;
    info!(
        policy = %config.policy().name,
        version = %config.policy().version,
        customer_expense_threshold_days = config.customer_expense_threshold_days(),
        grace_period_days = config.grace_period_days(),
        "Loaded SIT policy"
    );

    let router = create_router(AppState::new(config));
    let listener = TcpListener::bind((cli.host.as_str(), cli.port)).await?;
    info!(addr = %listener.local_addr()?, "SIT ledger listening");

    axum::serve(listener, router).await?;
    Ok(())
}
