//! Image upload and analysis.

use brochat_llm_api::{require_text, GatewayError, GenerativeBackend};
use brochat_types::{
    ConversationEntry, Notice, IMAGE_CHECKED_MARKER, IMAGE_CHECKED_NOTICE, IMAGE_EMPTY_NOTICE,
    IMAGE_ERROR_PREFIX, IMAGE_INSTRUCTION, NO_IMAGE_NOTICE,
};
use thiserror::Error;

use crate::chat::state::SessionState;

/// Formats accepted by the uploader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Identify an image from its leading bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("No image was uploaded.")]
    Empty,

    #[error("That file is too big, bro. Max upload size is {limit_mb} MB.")]
    TooLarge { limit_mb: usize },

    #[error("That doesn't look like an image, bro. Supported formats: PNG, JPEG, GIF, WEBP.")]
    Unsupported,

    #[error("Bro is not available right now. Set up your API key first.")]
    NotReady,
}

/// An accepted upload, held until it is analyzed or replaced
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedImage")
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Validate raw upload bytes and store them on the session
pub fn accept_upload(
    state: &mut SessionState,
    file_name: Option<String>,
    bytes: Vec<u8>,
    max_bytes: usize,
) -> Result<(), ImageError> {
    if !state.is_ready() {
        return Err(ImageError::NotReady);
    }
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(ImageError::TooLarge {
            limit_mb: max_bytes / (1024 * 1024),
        });
    }
    let format = ImageFormat::sniff(&bytes).ok_or(ImageError::Unsupported)?;

    log::info!(
        "Accepted {} upload ({} bytes)",
        format.mime_type(),
        bytes.len()
    );
    state.set_image(UploadedImage {
        file_name,
        format,
        bytes,
    });
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Nothing to analyze or backend not configured
    Skipped,
    Described,
    Empty,
    Failed(String),
}

/// Ask the session's model to describe the pending image.
///
/// On success the description is appended to the history and the image is
/// dropped. On any failure the history is untouched and the image stays so the
/// user can retry.
pub async fn analyze_image(
    state: &mut SessionState,
    backend: &dyn GenerativeBackend,
) -> AnalysisOutcome {
    let handle = match state.ready_backend() {
        Some(handle) => handle.clone(),
        None => {
            state.push_notice(Notice::error(brochat_types::UNAVAILABLE_MESSAGE));
            return AnalysisOutcome::Skipped;
        }
    };
    let (mime_type, bytes) = match &state.uploaded_image {
        Some(image) => (image.mime_type(), image.bytes.clone()),
        None => {
            state.push_notice(Notice::error(NO_IMAGE_NOTICE));
            return AnalysisOutcome::Skipped;
        }
    };

    let result = backend
        .generate_from_image(
            &handle.credential,
            &handle.model,
            IMAGE_INSTRUCTION,
            mime_type,
            &bytes,
        )
        .await;

    match require_text(result) {
        Ok(text) => {
            state.append(ConversationEntry::assistant(format!(
                "{}\n\n{}",
                IMAGE_CHECKED_MARKER, text
            )));
            state.push_notice(Notice::success(IMAGE_CHECKED_NOTICE));
            state.take_image();
            AnalysisOutcome::Described
        }
        Err(GatewayError::EmptyResponse) => {
            state.push_notice(Notice::error(IMAGE_EMPTY_NOTICE));
            AnalysisOutcome::Empty
        }
        Err(e) => {
            log::warn!("Image analysis failed: {}", e);
            let message = format!("{}{}", IMAGE_ERROR_PREFIX, e);
            state.push_notice(Notice::error(message.clone()));
            AnalysisOutcome::Failed(message)
        }
    }
}
