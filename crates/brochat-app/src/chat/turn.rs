use brochat_llm_api::{require_text, GatewayError, GenerativeBackend};
use brochat_types::{
    is_exit_command, ConversationEntry, Notice, EMPTY_RESPONSE_MESSAGE, ERROR_MESSAGE_PREFIX,
    FAREWELL_MESSAGE, SYSTEM_INSTRUCTION, UNAVAILABLE_MESSAGE,
};

use crate::chat::state::SessionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input, nothing happened
    Ignored,
    /// No usable backend; history untouched
    Unavailable,
    Farewell,
    Replied,
    EmptyReply,
    Failed(String),
}

/// Process one submitted chat message.
///
/// Every non-blank message from a ready session appends exactly two entries:
/// the user's text and then the assistant's reply, farewell, fallback or error
/// text. Each call is single-turn; prior history is not sent to the model.
/// Whitespace only matters for the blank and exit checks; the message is
/// stored and sent as typed.
pub async fn process_chat_turn(
    state: &mut SessionState,
    backend: &dyn GenerativeBackend,
    input: &str,
) -> TurnOutcome {
    if input.trim().is_empty() {
        return TurnOutcome::Ignored;
    }

    let handle = match state.ready_backend() {
        Some(handle) => handle.clone(),
        None => {
            state.push_notice(Notice::error(UNAVAILABLE_MESSAGE));
            return TurnOutcome::Unavailable;
        }
    };

    state.append(ConversationEntry::user(input));

    if is_exit_command(input) {
        state.append(ConversationEntry::assistant(FAREWELL_MESSAGE));
        return TurnOutcome::Farewell;
    }

    log::debug!("Chat turn on {} ({} chars)", handle.model, input.len());
    let result = backend
        .generate_text(
            &handle.credential,
            &handle.model,
            Some(SYSTEM_INSTRUCTION),
            input,
        )
        .await;

    match require_text(result) {
        Ok(text) => {
            state.append(ConversationEntry::assistant(text));
            TurnOutcome::Replied
        }
        Err(GatewayError::EmptyResponse) => {
            state.append(ConversationEntry::assistant(EMPTY_RESPONSE_MESSAGE));
            TurnOutcome::EmptyReply
        }
        Err(e) => {
            log::warn!("Chat turn failed on {}: {}", handle.model, e);
            let message = format!("{}{}", ERROR_MESSAGE_PREFIX, e);
            state.append(ConversationEntry::assistant(message.clone()));
            state.push_notice(Notice::error(format!("Error: {}", e)));
            TurnOutcome::Failed(message)
        }
    }
}
