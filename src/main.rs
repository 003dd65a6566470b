//! PG Admin
//!
//! Main application entry point

use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use pg_admin::{
    config::Settings,
    handlers::run_shell,
    services::ServiceFactory,
    state::AppContext,
    utils::logging,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "pg-admin", version, about = "Paying-guest accommodation admin console")]
struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long)]
    log_level: Option<String>,

    /// Where the login lockout state is kept
    #[arg(long)]
    state_path: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    if let Some(state_path) = cli.state_path {
        settings.storage.state_path = state_path;
    }
    settings.validate().context("Invalid configuration")?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}", pg_admin::info());

    // Initialize services
    let services = ServiceFactory::new(&settings)?;
    let mut ctx = AppContext::from_factory(services, settings).await;

    println!("{} - type 'help' for commands", pg_admin::info());
    let mut stdout = std::io::stdout();
    let result = run_shell(&mut ctx, BufReader::new(tokio::io::stdin()), &mut stdout).await;

    ctx.shutdown();
    info!("PG Admin has been shut down.");

    result.map_err(Into::into)
}
