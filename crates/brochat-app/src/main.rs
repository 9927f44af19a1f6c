use anyhow::Result;
use clap::Parser;

use brochat::{run_web_server, setup_from_cli, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Set up application configuration from CLI
    let app_config = setup_from_cli(&cli)?;
    log::debug!("Configuration: {:?}", app_config);

    run_web_server(app_config).await
}
