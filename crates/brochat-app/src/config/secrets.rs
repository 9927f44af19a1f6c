use anyhow::{Context, Result};
use std::path::Path;

/// Name of the secret holding the Gemini API key
pub const GEMINI_API_KEY_SECRET: &str = "GEMINI_API_KEY";

/// Read a top-level string from a TOML secrets file.
///
/// A missing file or missing key is `Ok(None)`; a file that exists but does
/// not parse is an error.
pub fn load_secret(path: &Path, key: &str) -> Result<Option<String>> {
    if !path.exists() {
        log::debug!("No secrets file at {}", path.display());
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read secrets file {}", path.display()))?;
    let table: toml::Table = raw
        .parse()
        .with_context(|| format!("Failed to parse secrets file {}", path.display()))?;

    Ok(table
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}
