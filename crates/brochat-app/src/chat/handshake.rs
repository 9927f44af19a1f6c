//! Backend configuration handshake.
//!
//! Manual mode: the user submits a credential, a working model is probed for
//! and the session becomes `Ready` or rolls back to `Unconfigured`.
//! Auto mode: the credential comes from the secret store and a fixed model is
//! assumed without probing.

use brochat_llm_api::{probe_backend, GatewayError, GenerativeBackend};
use brochat_types::Notice;

use crate::chat::state::{BackendHandle, BackendState, SessionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeOutcome {
    Ready { model: String },
    Failed(GatewayError),
}

/// Probe `credential` and move the session to `Ready` on success.
///
/// A failed attempt leaves the session `Unconfigured` with an error notice,
/// replacing whatever handle it had before.
pub async fn configure_with_credential(
    state: &mut SessionState,
    backend: &dyn GenerativeBackend,
    credential: &str,
) -> HandshakeOutcome {
    let credential = credential.trim();
    state.backend = BackendState::Probing;

    match probe_backend(backend, credential).await {
        Ok(model) => {
            log::info!(
                "Session backend ready: model={} key={}",
                model,
                brochat_logging::mask_secret(credential)
            );
            state.backend = BackendState::Ready(BackendHandle {
                credential: credential.to_string(),
                model: model.clone(),
            });
            state.push_notice(Notice::success(format!(
                "API key set! Bro is ready using {}.",
                model
            )));
            HandshakeOutcome::Ready { model }
        }
        Err(e) => {
            log::warn!("Credential handshake failed: {}", e);
            state.backend = BackendState::Failed;
            state.push_notice(Notice::error(describe_failure(&e)));
            state.backend = BackendState::Unconfigured;
            HandshakeOutcome::Failed(e)
        }
    }
}

/// Configure from a pre-provisioned secret with a fixed model
pub fn configure_from_secret(
    state: &mut SessionState,
    secret: Option<&str>,
    model: &str,
) -> HandshakeOutcome {
    match secret.map(str::trim).filter(|s| !s.is_empty()) {
        Some(credential) => {
            state.backend = BackendState::Ready(BackendHandle {
                credential: credential.to_string(),
                model: model.to_string(),
            });
            HandshakeOutcome::Ready {
                model: model.to_string(),
            }
        }
        None => {
            state.backend = BackendState::Unconfigured;
            state.push_notice(Notice::error(GatewayError::MissingCredential.to_string()));
            HandshakeOutcome::Failed(GatewayError::MissingCredential)
        }
    }
}

fn describe_failure(error: &GatewayError) -> String {
    match error {
        GatewayError::MissingCredential => "Please enter an API key, bro.".to_string(),
        GatewayError::CredentialRejected(msg) => format!("Invalid API key: {}", msg),
        other => format!("Error configuring API: {}", other),
    }
}
