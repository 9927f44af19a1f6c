use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

pub mod gemini;

/// Generation method a model must expose to be used for chat
pub const GENERATE_CONTENT_METHOD: &str = "generateContent";

/// A model identifier as enumerated by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Identifier without the `models/` prefix, e.g. `gemini-1.5-flash`
    pub name: String,
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, methods: &[&str]) -> Self {
        Self {
            name: name.into(),
            supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Whether the model accepts free-form generation requests
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT_METHOD)
    }
}

/// Hosted model API as seen by the chat server.
///
/// Implementations are stateless: the credential and model travel with every call.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Enumerate the models callable with this credential
    async fn list_models(&self, credential: &str) -> Result<Vec<ModelInfo>, GatewayError>;

    /// Generate text for a single prompt, optionally bound to a system instruction.
    /// An empty string means the model produced no text.
    async fn generate_text(
        &self,
        credential: &str,
        model: &str,
        system_instruction: Option<&str>,
        prompt: &str,
    ) -> Result<String, GatewayError>;

    /// Describe an image following `instruction`
    async fn generate_from_image(
        &self,
        credential: &str,
        model: &str,
        instruction: &str,
        mime_type: &str,
        image: &[u8],
    ) -> Result<String, GatewayError>;
}
