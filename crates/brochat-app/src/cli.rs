use clap::Parser;
use std::path::PathBuf;

use crate::config::ConfigMode;

/// CLI arguments for brochat
#[derive(Parser, Debug)]
#[command(name = "brochat")]
#[command(about = "Bro Chatbot - chat with your chill Bro, powered by Gemini")]
#[command(version)]
pub struct Cli {
    /// Address to bind the web server to
    #[arg(long, env = "BROCHAT_BIND", default_value = "127.0.0.1")]
    pub bind: String,

    /// Port to bind the web server to
    #[arg(long, env = "BROCHAT_PORT", default_value_t = 8501)]
    pub port: u16,

    /// How sessions obtain their API key
    #[arg(long, env = "BROCHAT_MODE", value_enum, default_value_t = ConfigMode::Manual)]
    pub mode: ConfigMode,

    /// Gemini API key used in auto mode (takes precedence over the secrets file)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// TOML file holding GEMINI_API_KEY for auto mode
    #[arg(long, value_name = "PATH", default_value = ".streamlit/secrets.toml")]
    pub secrets_file: PathBuf,

    /// Model used in auto mode
    #[arg(long, env = "BROCHAT_MODEL", value_name = "MODEL")]
    pub model: Option<String>,

    /// Gemini API base URL (e.g. http://localhost:8080 for a mock)
    #[arg(long, env = "BROCHAT_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Timeout for each model request, in seconds
    #[arg(long, value_name = "SECS", default_value_t = brochat_llm_api::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Maximum image upload size, in megabytes
    #[arg(long, value_name = "MB", default_value_t = 20)]
    pub max_upload_mb: usize,

    /// Drop sessions idle for longer than this many minutes (0 keeps them forever)
    #[arg(long, value_name = "MINUTES", default_value_t = 60)]
    pub session_ttl_mins: i64,

    /// Write every model request and response to ~/.brochat/logs
    #[arg(long)]
    pub log_requests: bool,

    /// Show detailed debug information
    #[arg(short, long)]
    pub verbose: bool,
}
