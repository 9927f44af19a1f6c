use brochat_llm_api::GatewayConfig;
use chrono::Duration;
use clap::ValueEnum;
use std::fmt;
use std::net::SocketAddr;

pub mod secrets;

pub use secrets::{load_secret, GEMINI_API_KEY_SECRET};

/// Where a session's credential comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ConfigMode {
    /// The user enters a key in the sidebar and a working model is probed for
    #[default]
    Manual,
    /// The key comes from the secret store and a fixed model is assumed
    Auto,
}

impl fmt::Display for ConfigMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigMode::Manual => write!(f, "manual"),
            ConfigMode::Auto => write!(f, "auto"),
        }
    }
}

/// Server-wide settings shared by every session
#[derive(Clone)]
pub struct ServerSettings {
    pub mode: ConfigMode,
    /// Only consulted in auto mode
    pub secret: Option<String>,
    pub fixed_model: String,
    pub max_upload_bytes: usize,
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("mode", &self.mode)
            .field(
                "secret",
                &self.secret.as_deref().map(brochat_logging::mask_secret),
            )
            .field("fixed_model", &self.fixed_model)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            mode: ConfigMode::Manual,
            secret: None,
            fixed_model: brochat_types::DEFAULT_MODEL.to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Application configuration derived from CLI arguments and environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub gateway: GatewayConfig,
    pub settings: ServerSettings,
    pub session_ttl: Option<Duration>,
}
