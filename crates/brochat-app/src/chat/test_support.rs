//! In-memory backend shared by the unit tests.

use async_trait::async_trait;
use brochat_llm_api::{GatewayError, GenerativeBackend, ModelInfo, GENERATE_CONTENT_METHOD};
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCall {
    pub credential: String,
    pub model: String,
    pub system_instruction: Option<String>,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCall {
    pub model: String,
    pub instruction: String,
    pub mime_type: String,
    pub len: usize,
}

pub struct FakeBackend {
    models: Result<Vec<ModelInfo>, GatewayError>,
    reply: Result<String, GatewayError>,
    failing_models: HashSet<String>,
    text_calls: Mutex<Vec<TextCall>>,
    image_calls: Mutex<Vec<ImageCall>>,
}

impl FakeBackend {
    pub fn replying(reply: &str) -> Self {
        Self {
            models: Ok(vec![ModelInfo::new("gemini-1.5-flash", &[GENERATE_CONTENT_METHOD])]),
            reply: Ok(reply.to_string()),
            failing_models: HashSet::new(),
            text_calls: Mutex::new(Vec::new()),
            image_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: GatewayError) -> Self {
        Self {
            reply: Err(error),
            ..Self::replying("")
        }
    }

    pub fn with_models(mut self, names: &[&str]) -> Self {
        self.models = Ok(names
            .iter()
            .map(|n| ModelInfo::new(*n, &[GENERATE_CONTENT_METHOD]))
            .collect());
        self
    }

    pub fn with_list_error(mut self, error: GatewayError) -> Self {
        self.models = Err(error);
        self
    }

    pub fn with_failing_models(mut self, names: &[&str]) -> Self {
        self.failing_models = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn text_calls(&self) -> Vec<TextCall> {
        self.text_calls.lock().unwrap().clone()
    }

    pub fn image_calls(&self) -> Vec<ImageCall> {
        self.image_calls.lock().unwrap().clone()
    }

    fn answer_for(&self, model: &str) -> Result<String, GatewayError> {
        if self.failing_models.contains(model) {
            return Err(GatewayError::Provider {
                status: 404,
                message: format!("NOT_FOUND: {} is not found", model),
            });
        }
        self.reply.clone()
    }
}

#[async_trait]
impl GenerativeBackend for FakeBackend {
    async fn list_models(&self, _credential: &str) -> Result<Vec<ModelInfo>, GatewayError> {
        self.models.clone()
    }

    async fn generate_text(
        &self,
        credential: &str,
        model: &str,
        system_instruction: Option<&str>,
        prompt: &str,
    ) -> Result<String, GatewayError> {
        self.text_calls.lock().unwrap().push(TextCall {
            credential: credential.to_string(),
            model: model.to_string(),
            system_instruction: system_instruction.map(str::to_string),
            prompt: prompt.to_string(),
        });
        self.answer_for(model)
    }

    async fn generate_from_image(
        &self,
        _credential: &str,
        model: &str,
        instruction: &str,
        mime_type: &str,
        image: &[u8],
    ) -> Result<String, GatewayError> {
        self.image_calls.lock().unwrap().push(ImageCall {
            model: model.to_string(),
            instruction: instruction.to_string(),
            mime_type: mime_type.to_string(),
            len: image.len(),
        });
        self.answer_for(model)
    }
}
