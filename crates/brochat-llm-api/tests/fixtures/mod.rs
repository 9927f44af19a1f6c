use serde_json::json;
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";

/// Mock server utilities for testing the Gemini client
pub struct GeminiMockServer {
    server: MockServer,
}

impl GeminiMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Mock a single page of the model listing
    pub async fn mock_list_models(&self, models: &[(&str, &str)]) {
        let models: Vec<_> = models
            .iter()
            .map(|(name, method)| {
                json!({
                    "name": format!("models/{}", name),
                    "supportedGenerationMethods": [method],
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/models"))
            .and(header("x-goog-api-key", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": models })))
            .mount(&self.server)
            .await;
    }

    /// Mock a successful generation for one model
    pub async fn mock_generate_success(&self, model: &str, response_text: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/models/{}:generateContent", model)))
            .and(header("x-goog-api-key", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{ "text": response_text }]
                    },
                    "finishReason": "STOP"
                }],
                "usageMetadata": {
                    "promptTokenCount": 10,
                    "candidatesTokenCount": 20,
                    "totalTokenCount": 30
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a provider error for one model
    pub async fn mock_generate_error(&self, model: &str, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/models/{}:generateContent", model)))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {
                    "code": status,
                    "message": message,
                    "status": "NOT_FOUND"
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock the invalid-key answer Gemini gives for every endpoint
    pub async fn mock_invalid_key(&self) {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .mount(&self.server)
            .await;
    }
}
