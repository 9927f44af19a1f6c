//! Bro Chatbot Application Library
//!
//! Per-session chat state, the backend handshake and the axum web frontend.

// Re-export workspace crates
pub use brochat_llm_api::{self as llm_api, GatewayError, GenerativeBackend};
pub use brochat_types::{self as types, BroIcon, ConversationEntry, Role};

// Local modules
pub mod app;
pub mod chat;
pub mod cli;
pub mod config;
pub mod web;

// Re-exports from local modules
pub use app::{run_web_server, setup_from_cli};
pub use chat::{process_chat_turn, SessionState, TurnOutcome};
pub use cli::Cli;
pub use config::{AppConfig, ConfigMode, ServerSettings};
