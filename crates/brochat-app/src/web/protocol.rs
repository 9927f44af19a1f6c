use serde::{Deserialize, Serialize};

use crate::chat::HandshakePhase;
use crate::web::session_manager::SessionId;

/// Session summary returned by the JSON API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub created_at: String,
    pub last_activity: String,
    pub message_count: usize,
    pub bro_icon: String,
    pub backend: HandshakePhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub has_image: bool,
}

/// Optional body for `POST /api/sessions`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub bro_icon: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IconForm {
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialForm {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}
