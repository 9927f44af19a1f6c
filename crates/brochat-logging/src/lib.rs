// Logging crate - request/response logging for the hosted model API
pub mod request_logger;

use anyhow::{Context, Result};
use std::path::PathBuf;

pub use request_logger::{log_request, log_response, mask_secret, redact_inline_data, RequestLogger};

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Get or create the base brochat directory (~/.brochat)
pub fn get_brochat_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    let brochat_dir = PathBuf::from(home_dir).join(".brochat");

    if !brochat_dir.exists() {
        std::fs::create_dir_all(&brochat_dir).context("Failed to create brochat directory")?;
    }

    Ok(brochat_dir)
}

/// Get or create the logs directory (~/.brochat/logs)
pub fn get_logs_dir() -> Result<PathBuf> {
    let logs_dir = get_brochat_dir()?.join("logs");

    if !logs_dir.exists() {
        std::fs::create_dir_all(&logs_dir).context("Failed to create logs directory")?;
    }

    Ok(logs_dir)
}
