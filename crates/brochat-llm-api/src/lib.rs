//! # brochat-llm-api
//!
//! Stateless gateway between the chat server and the hosted Gemini API.
//!
//! ## Features
//!
//! - **Unified Interface**: the `GenerativeBackend` trait covers model listing,
//!   text generation and image description
//! - **Gemini REST client**: `GeminiClient` speaks the v1beta `generateContent` API
//! - **Model selection**: `order_candidates` and `probe_backend` pick a working
//!   model for a freshly supplied credential
//!
//! ## Example
//!
//! ```rust,no_run
//! use brochat_llm_api::{probe_backend, GeminiClient, GenerativeBackend, GEMINI_API_URL};
//!
//! # async fn run() -> Result<(), brochat_llm_api::GatewayError> {
//! let client = GeminiClient::new(GEMINI_API_URL);
//! let model = probe_backend(&client, "your-api-key").await?;
//! let reply = client
//!     .generate_text("your-api-key", &model, Some("Be brief."), "Hello!")
//!     .await?;
//! println!("{}: {}", model, reply);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod selection;


pub use client::{gemini::GeminiClient, GenerativeBackend, ModelInfo, GENERATE_CONTENT_METHOD};
pub use config::{normalize_api_url, GatewayConfig, DEFAULT_TIMEOUT_SECS, GEMINI_API_URL};
pub use error::{require_text, GatewayError};
pub use selection::{order_candidates, probe_backend};
