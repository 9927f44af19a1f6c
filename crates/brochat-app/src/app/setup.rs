use anyhow::{Context, Result};
use brochat_llm_api::{GatewayConfig, GEMINI_API_URL};
use chrono::Duration;
use colored::Colorize;
use std::net::SocketAddr;

use crate::cli::Cli;
use crate::config::{load_secret, AppConfig, ConfigMode, ServerSettings, GEMINI_API_KEY_SECRET};

/// Set up application configuration from CLI arguments
pub fn setup_from_cli(cli: &Cli) -> Result<AppConfig> {
    let bind_addr: SocketAddr = format!("{}:{}", cli.bind, cli.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", cli.bind, cli.port))?;

    // Precedence for auto mode: --api-key / GEMINI_API_KEY > secrets file
    let secret = match cli.mode {
        ConfigMode::Manual => None,
        ConfigMode::Auto => {
            let from_cli = cli
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            match from_cli {
                Some(key) => Some(key),
                None => load_secret(&cli.secrets_file, GEMINI_API_KEY_SECRET)?,
            }
        }
    };

    if cli.mode == ConfigMode::Auto && secret.is_none() {
        eprintln!(
            "{} No {} found in --api-key, the environment or {}. Sessions will not be able to chat.",
            "⚠️".yellow(),
            GEMINI_API_KEY_SECRET,
            cli.secrets_file.display()
        );
    }

    let request_log_dir = if cli.log_requests {
        Some(brochat_logging::get_logs_dir()?)
    } else {
        None
    };

    let gateway = GatewayConfig {
        api_url: cli.api_url.clone().unwrap_or_else(|| GEMINI_API_URL.to_string()),
        timeout_secs: cli.timeout_secs,
        verbose: cli.verbose,
        request_log_dir,
    };

    let settings = ServerSettings {
        mode: cli.mode,
        secret,
        fixed_model: cli
            .model
            .clone()
            .unwrap_or_else(|| brochat_types::DEFAULT_MODEL.to_string()),
        max_upload_bytes: cli.max_upload_mb.max(1) * 1024 * 1024,
    };

    let session_ttl = (cli.session_ttl_mins > 0).then(|| Duration::minutes(cli.session_ttl_mins));

    Ok(AppConfig {
        bind_addr,
        gateway,
        settings,
        session_ttl,
    })
}
