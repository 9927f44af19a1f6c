use brochat_types::{BroIcon, ConversationEntry, Notice};
use serde::{Deserialize, Serialize};

use crate::chat::image::UploadedImage;

/// A working (credential, model) pair
#[derive(Clone, PartialEq, Eq)]
pub struct BackendHandle {
    pub credential: String,
    pub model: String,
}

impl std::fmt::Debug for BackendHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendHandle")
            .field("credential", &brochat_logging::mask_secret(&self.credential))
            .field("model", &self.model)
            .finish()
    }
}

/// Backend configuration handshake.
///
/// `Failed` is transient: the handshake rolls back to `Unconfigured` as soon
/// as the failure has been surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendState {
    #[default]
    Unconfigured,
    Probing,
    Ready(BackendHandle),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandshakePhase {
    Unconfigured,
    Probing,
    Ready,
    Failed,
}

impl BackendState {
    pub fn phase(&self) -> HandshakePhase {
        match self {
            BackendState::Unconfigured => HandshakePhase::Unconfigured,
            BackendState::Probing => HandshakePhase::Probing,
            BackendState::Ready(_) => HandshakePhase::Ready,
            BackendState::Failed => HandshakePhase::Failed,
        }
    }
}

/// Everything a browser session owns. Lives exactly as long as the session.
#[derive(Debug, Default)]
pub struct SessionState {
    messages: Vec<ConversationEntry>,
    pub bro_icon: BroIcon,
    pub backend: BackendState,
    pub uploaded_image: Option<UploadedImage>,
    notices: Vec<Notice>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[ConversationEntry] {
        &self.messages
    }

    pub fn append(&mut self, entry: ConversationEntry) {
        self.messages.push(entry);
    }

    pub fn clear_history(&mut self) {
        self.messages = Vec::new();
    }

    pub fn set_icon(&mut self, icon: BroIcon) {
        self.bro_icon = icon;
    }

    /// The active handle, only when the handshake reached `Ready`
    pub fn ready_backend(&self) -> Option<&BackendHandle> {
        match &self.backend {
            BackendState::Ready(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready_backend().is_some()
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Drain the notices queued since the last render
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Store an upload, replacing any previous one
    pub fn set_image(&mut self, image: UploadedImage) {
        self.uploaded_image = Some(image);
    }

    pub fn take_image(&mut self) -> Option<UploadedImage> {
        self.uploaded_image.take()
    }
}
