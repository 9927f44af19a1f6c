//! Core types and structures for brochat
//!
//! This crate provides the foundational types used across all brochat crates:
//! conversation entries, the persona constants and the fixed set of bro icons.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Persona
// ============================================================================

/// System instruction bound to every chat turn
pub const SYSTEM_INSTRUCTION: &str = "You are a chill but real Bro.
You call the user \"bro\", \"dude\", or \"man\" and always speak in a casual, friendly tone.
You keep it real and give honest advice, but always have your bro's back.
You're supportive, laid-back, and hype them up when needed.
Be cool, genuine, and act like a best friend who's always down to help.";

/// Instruction sent alongside an uploaded image. Not a system instruction.
pub const IMAGE_INSTRUCTION: &str = "You are a chill but real Bro. Check out this image and describe what you see
in the way a best friend would. Comment on it like a bro would - maybe hype them up,
give honest feedback, or share your thoughts. Be cool, casual, and supportive.";

/// Literal that ends the conversation without calling the backend
pub const EXIT_COMMAND: &str = "exit";

pub const FAREWELL_MESSAGE: &str = "Later, bro! Hit me up anytime, I got you!";
pub const EMPTY_RESPONSE_MESSAGE: &str = "My bad bro, couldn't come up with a response...";
pub const ERROR_MESSAGE_PREFIX: &str = "Yo, something went wrong: ";
pub const UNAVAILABLE_MESSAGE: &str = "Bro is not available right now. Please try again later.";

pub const IMAGE_CHECKED_MARKER: &str = "🖼️ *Bro checked out your image:*";
pub const IMAGE_CHECKED_NOTICE: &str = "Bro checked out the image!";
pub const IMAGE_EMPTY_NOTICE: &str = "Couldn't check this image out, bro.";
pub const IMAGE_ERROR_PREFIX: &str = "Error analyzing image: ";
pub const NO_IMAGE_NOTICE: &str = "Upload an image first, bro.";

/// Prompt used when probing a candidate model
pub const PROBE_PROMPT: &str = "Hello";

/// Model assumed to work when the credential comes from the secret store
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Returns true when the trimmed input is the exit command, ignoring ASCII case
pub fn is_exit_command(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(EXIT_COMMAND)
}

// ============================================================================
// Conversation Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
}

impl ConversationEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ============================================================================
// Bro Icons
// ============================================================================

/// The six avatars a session can pick for the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroIcon {
    #[default]
    Cool,
    Chill,
    Gym,
    Gamer,
    Cap,
    Rock,
}

impl BroIcon {
    pub const ALL: [BroIcon; 6] = [
        BroIcon::Cool,
        BroIcon::Chill,
        BroIcon::Gym,
        BroIcon::Gamer,
        BroIcon::Cap,
        BroIcon::Rock,
    ];

    pub fn glyph(&self) -> &'static str {
        match self {
            BroIcon::Cool => "😎",
            BroIcon::Chill => "🤙",
            BroIcon::Gym => "💪",
            BroIcon::Gamer => "🎮",
            BroIcon::Cap => "🧢",
            BroIcon::Rock => "🤘",
        }
    }

    /// Label shown in the selector, e.g. "😎 Cool Bro"
    pub fn label(&self) -> &'static str {
        match self {
            BroIcon::Cool => "😎 Cool Bro",
            BroIcon::Chill => "🤙 Chill Bro",
            BroIcon::Gym => "💪 Gym Bro",
            BroIcon::Gamer => "🎮 Gamer Bro",
            BroIcon::Cap => "🧢 Cap Bro",
            BroIcon::Rock => "🤘 Rock Bro",
        }
    }

    /// Stable key used in form values
    pub fn key(&self) -> &'static str {
        match self {
            BroIcon::Cool => "cool",
            BroIcon::Chill => "chill",
            BroIcon::Gym => "gym",
            BroIcon::Gamer => "gamer",
            BroIcon::Cap => "cap",
            BroIcon::Rock => "rock",
        }
    }

}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown bro icon '{0}'")]
pub struct UnknownBroIcon(pub String);

impl FromStr for BroIcon {
    type Err = UnknownBroIcon;

    /// Accepts a key, a label or a bare glyph
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|icon| {
                icon.key().eq_ignore_ascii_case(trimmed)
                    || icon.label() == trimmed
                    || icon.glyph() == trimmed
            })
            .ok_or_else(|| UnknownBroIcon(s.to_string()))
    }
}

// ============================================================================
// Notices
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Error,
    Success,
    Info,
}

/// A standalone message shown once on the next render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }
}
