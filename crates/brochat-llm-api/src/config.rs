use std::path::PathBuf;

/// Default Gemini REST endpoint (v1beta)
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Overall request timeout applied to every gateway call
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Settings for building a `GeminiClient`
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    /// Dump requests and responses to the console
    pub verbose: bool,
    /// Write per-request log files into this directory
    pub request_log_dir: Option<PathBuf>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: GEMINI_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verbose: false,
            request_log_dir: None,
        }
    }
}

/// Normalize a user supplied base URL so endpoint paths can be appended.
///
/// Accepts the bare host, the versioned base or the `/models` collection URL.
pub fn normalize_api_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    let url = url.strip_suffix("/models").unwrap_or(url);

    if url.ends_with("/v1beta") || url.ends_with("/v1") {
        url.to_string()
    } else {
        format!("{}/v1beta", url)
    }
}
