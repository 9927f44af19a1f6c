//! Gemini REST client.
//!
//! Calls the v1beta `models` and `generateContent` endpoints directly. The API
//! key travels in the `x-goog-api-key` header so it never shows up in URLs or
//! request logs.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use brochat_logging::{log_request, log_response, RequestLogger};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;

use crate::client::{GenerativeBackend, ModelInfo};
use crate::config::{normalize_api_url, GatewayConfig};
use crate::error::GatewayError;

const API_KEY_HEADER: &str = "x-goog-api-key";
const MODELS_PAGE_SIZE: &str = "1000";

/// Upper bound on listing pages followed in one call
const MAX_MODEL_PAGES: usize = 50;

/// Gemini API client implementing `GenerativeBackend`
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    verbose: bool,
    request_logger: Option<RequestLogger>,
}

impl GeminiClient {
    /// Client against `base_url` used as-is (minus a trailing slash)
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            verbose: false,
            request_logger: None,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let request_logger = match &config.request_log_dir {
            Some(dir) => Some(
                RequestLogger::with_dir(dir)
                    .map_err(|e| GatewayError::Transport(format!("request logging: {:#}", e)))?,
            ),
            None => None,
        };

        Ok(Self {
            client,
            base_url: normalize_api_url(&config.api_url),
            verbose: config.verbose,
            request_logger,
        })
    }

    pub fn with_request_logger(mut self, logger: RequestLogger) -> Self {
        self.request_logger = Some(logger);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    async fn generate(
        &self,
        credential: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, GatewayError> {
        let url = self.generate_url(model);
        let body = serde_json::to_value(request)?;

        log::info!("Gemini generateContent model={}", model);
        let builder = self.client.post(&url).json(&body);
        let response: GenerateContentResponse = self
            .dispatch(builder, "POST", &url, credential, Some(model), Some(&body))
            .await?;

        extract_text(response)
    }

    /// Send a request, log both directions and decode the JSON answer
    async fn dispatch<R: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        method: &str,
        url: &str,
        credential: &str,
        model: Option<&str>,
        body: Option<&Value>,
    ) -> Result<R, GatewayError> {
        log_request(method, url, body, credential, self.verbose);
        let log_stamp = self.request_logger.as_ref().and_then(|logger| {
            logger
                .log_request_to_file(method, url, model, body, credential)
                .map_err(|e| log::warn!("Failed to log request: {:#}", e))
                .ok()
        });

        let response = builder
            .header(API_KEY_HEADER, credential)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        log_response(&status, &text, self.verbose);
        if let (Some(logger), Some(stamp)) = (&self.request_logger, &log_stamp) {
            if let Err(e) = logger.log_response_to_file(&status, &text, stamp, model) {
                log::warn!("Failed to log response: {:#}", e);
            }
        }

        if !status.is_success() {
            let err = map_http_error(status, &text);
            log::warn!("Gemini {} {} failed: {}", method, url, err);
            return Err(err);
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn list_models(&self, credential: &str) -> Result<Vec<ModelInfo>, GatewayError> {
        let url = self.models_url();
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        for _ in 0..MAX_MODEL_PAGES {
            let mut query = vec![("pageSize", MODELS_PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let builder = self.client.get(&url).query(&query);
            let page: ListModelsResponse = self
                .dispatch(builder, "GET", &url, credential, None, None)
                .await?;

            models.extend(page.models.into_iter().map(|raw| ModelInfo {
                name: strip_models_prefix(&raw.name).to_string(),
                supported_generation_methods: raw.supported_generation_methods,
            }));

            let token = match page.next_page_token {
                Some(token) if !token.is_empty() => token,
                _ => break,
            };
            if !seen_tokens.insert(token.clone()) {
                log::warn!("Gemini repeated page token '{}', stopping model listing", token);
                break;
            }
            page_token = Some(token);
        }

        log::debug!("Gemini listed {} models", models.len());
        Ok(models)
    }

    async fn generate_text(
        &self,
        credential: &str,
        model: &str,
        system_instruction: Option<&str>,
        prompt: &str,
    ) -> Result<String, GatewayError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part::Text {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: system_instruction.map(|text| SystemInstruction {
                parts: vec![Part::Text {
                    text: text.to_string(),
                }],
            }),
        };

        self.generate(credential, model, &request).await
    }

    async fn generate_from_image(
        &self,
        credential: &str,
        model: &str,
        instruction: &str,
        mime_type: &str,
        image: &[u8],
    ) -> Result<String, GatewayError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::Text {
                        text: instruction.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineDataPayload {
                            mime_type: mime_type.to_string(),
                            data: BASE64_STANDARD.encode(image),
                        },
                    },
                ],
            }],
            system_instruction: None,
        };

        self.generate(credential, model, &request).await
    }
}

fn strip_models_prefix(name: &str) -> &str {
    name.strip_prefix("models/").unwrap_or(name)
}

/// Concatenate the text parts of the first candidate.
///
/// A reply without candidates but with a block reason is an error; any other
/// reply without text yields an empty string.
fn extract_text(response: GenerateContentResponse) -> Result<String, GatewayError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GatewayError::Blocked(reason));
        }
        return Ok(String::new());
    };

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|part| !part.thought)
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    Ok(text)
}

fn map_http_error(status: StatusCode, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| {
            let msg = wrapper.error.message?;
            Some(match wrapper.error.status {
                Some(s) if !s.is_empty() => format!("{}: {}", s, msg),
                _ => msg,
            })
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                brochat_logging::safe_truncate(trimmed, 300)
            }
        });

    GatewayError::Provider {
        status: status.as_u16(),
        message,
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<RawModel>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModel {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}
