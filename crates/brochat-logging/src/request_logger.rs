use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::safe_truncate;

/// Base64 payloads longer than this are replaced by a size marker in logs
const MAX_INLINE_DATA_CHARS: usize = 64;

/// Console dumps are cut at this many characters
const MAX_CONSOLE_BODY_CHARS: usize = 5000;

/// Show only the first few characters of a credential
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "<none>".to_string();
    }
    if secret.chars().count() <= 12 {
        return "***".to_string();
    }
    format!("{}***", secret.chars().take(6).collect::<String>())
}

/// Replace long `data` strings (base64 image payloads) with a size marker
pub fn redact_inline_data(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if key == "data" {
                    if let Value::String(s) = child {
                        if s.len() > MAX_INLINE_DATA_CHARS {
                            *child = Value::String(format!("<{} bytes of base64>", s.len()));
                            continue;
                        }
                    }
                }
                redact_inline_data(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_inline_data),
        _ => {}
    }
}

fn pretty_body(body: &Value) -> String {
    let mut redacted = body.clone();
    redact_inline_data(&mut redacted);
    serde_json::to_string_pretty(&redacted)
        .unwrap_or_else(|e| format!("Error serializing body: {}", e))
}

/// Log HTTP request details for debugging (console output)
pub fn log_request(method: &str, url: &str, body: Option<&Value>, api_key: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "🔍 HTTP REQUEST DEBUG".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());
    println!("{}: {} {}", "Request".bright_yellow(), method, url);
    println!("{}: {}", "x-goog-api-key".bright_yellow(), mask_secret(api_key));

    if let Some(body) = body {
        println!("\n{}", "Request Body:".bright_yellow());
        println!("{}", safe_truncate(&pretty_body(body), MAX_CONSOLE_BODY_CHARS));
    }

    println!("{}", "═".repeat(80).bright_cyan());
}

/// Log HTTP response details for debugging (console output)
pub fn log_response(status: &reqwest::StatusCode, body: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_green());
    println!("{}", "📥 HTTP RESPONSE DEBUG".bright_green().bold());
    println!("{}", "═".repeat(80).bright_green());
    println!(
        "{}: {} {}",
        "Status".bright_yellow(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );
    println!("\n{}", "Response Body:".bright_yellow());
    println!("{}", safe_truncate(body, MAX_CONSOLE_BODY_CHARS));
    println!("{}", "═".repeat(80).bright_green());
}

/// Writes one file per request and per response for persistent debugging
#[derive(Debug, Clone)]
pub struct RequestLogger {
    logs_dir: PathBuf,
}

impl RequestLogger {
    pub fn with_dir(logs_dir: impl Into<PathBuf>) -> Result<Self> {
        let logs_dir = logs_dir.into();
        fs::create_dir_all(&logs_dir)
            .with_context(|| format!("Failed to create logs directory {}", logs_dir.display()))?;
        Ok(Self { logs_dir })
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// Log an outgoing request. Returns the timestamp used to pair the response file.
    pub fn log_request_to_file(
        &self,
        method: &str,
        url: &str,
        model: Option<&str>,
        body: Option<&Value>,
        api_key: &str,
    ) -> Result<String> {
        let timestamp = chrono::Utc::now().format("%Y%m%d-%H%M%S%.3f").to_string();
        let filename = format!("req-{}-{}.txt", timestamp, file_tag(model));
        let file_path = self.logs_dir.join(&filename);

        let mut log_content = String::new();
        log_content.push_str("HTTP REQUEST LOG\n");
        log_content.push_str("================\n\n");
        log_content.push_str(&format!("Timestamp: {}\n", timestamp));
        log_content.push_str(&format!("Model: {}\n\n", model.unwrap_or("-")));
        log_content.push_str(&format!("{} {}\n\n", method, url));
        log_content.push_str("Headers:\n");
        log_content.push_str("  Content-Type: application/json\n");
        log_content.push_str(&format!("  x-goog-api-key: {}\n\n", mask_secret(api_key)));

        if let Some(body) = body {
            log_content.push_str("Request Body:\n");
            log_content.push_str(&pretty_body(body));
            log_content.push('\n');
        }

        fs::write(&file_path, log_content)
            .with_context(|| format!("Failed to write request log to {}", file_path.display()))?;

        log::debug!("📝 Request logged to: {}", filename);
        Ok(timestamp)
    }

    /// Log the response paired with a request timestamp
    pub fn log_response_to_file(
        &self,
        status: &reqwest::StatusCode,
        body: &str,
        request_timestamp: &str,
        model: Option<&str>,
    ) -> Result<PathBuf> {
        let filename = format!("resp-{}-{}.txt", request_timestamp, file_tag(model));
        let file_path = self.logs_dir.join(&filename);

        let mut log_content = String::new();
        log_content.push_str("HTTP RESPONSE LOG\n");
        log_content.push_str("=================\n\n");
        log_content.push_str(&format!("Timestamp: {}\n", request_timestamp));
        log_content.push_str(&format!("Model: {}\n\n", model.unwrap_or("-")));
        log_content.push_str(&format!(
            "Status: {} {}\n\n",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ));

        log_content.push_str("Response Body:\n");
        match serde_json::from_str::<Value>(body) {
            Ok(json) => log_content.push_str(&pretty_body(&json)),
            Err(_) => log_content.push_str(body),
        }
        log_content.push_str(&format!("\n\n---\nResponse Size: {} bytes\n", body.len()));

        fs::write(&file_path, log_content)
            .with_context(|| format!("Failed to write response log to {}", file_path.display()))?;

        log::debug!("📄 Response logged to: {}", filename);
        Ok(file_path)
    }
}

fn file_tag(model: Option<&str>) -> String {
    model.unwrap_or("models").replace(['/', ':'], "-")
}
