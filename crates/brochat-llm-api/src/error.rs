use thiserror::Error;

/// Errors surfaced by the gateway. None of them are fatal to a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("API key not found! Please configure GEMINI_API_KEY in secrets.")]
    MissingCredential,

    #[error("credential rejected: {0}")]
    CredentialRejected(String),

    #[error("no model could be reached with this credential: {last_error}")]
    ProbeExhausted { last_error: String },

    #[error("the model returned an empty response")]
    EmptyResponse,

    #[error("response blocked by the provider: {0}")]
    Blocked(String),

    #[error("{message} (HTTP {status})")]
    Provider { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// True for provider answers that mean the key itself is bad
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, GatewayError::Provider { status, .. } if matches!(status, 400 | 401 | 403))
            || matches!(self, GatewayError::CredentialRejected(_))
    }
}

/// Turn a blank generation into `EmptyResponse`
pub fn require_text(result: Result<String, GatewayError>) -> Result<String, GatewayError> {
    match result {
        Ok(text) if text.trim().is_empty() => Err(GatewayError::EmptyResponse),
        other => other,
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}
