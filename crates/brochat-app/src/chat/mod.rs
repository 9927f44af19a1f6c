// Per-session chat processing
pub mod handshake;
pub mod image;
pub mod state;
pub mod turn;

#[cfg(test)]
pub(crate) mod test_support;

pub use handshake::{configure_from_secret, configure_with_credential, HandshakeOutcome};
pub use image::{accept_upload, analyze_image, AnalysisOutcome, ImageError, ImageFormat, UploadedImage};
pub use state::{BackendHandle, BackendState, HandshakePhase, SessionState};
pub use turn::{process_chat_turn, TurnOutcome};
