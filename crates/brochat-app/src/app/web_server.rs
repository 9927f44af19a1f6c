use anyhow::Result;
use brochat_llm_api::GeminiClient;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::web::server::{WebServer, WebServerConfig};

/// Run the web server
pub async fn run_web_server(config: AppConfig) -> Result<()> {
    let client = GeminiClient::from_config(&config.gateway)?;

    println!("😎 Starting Bro Chatbot web server...");
    println!("   Address: {}", config.bind_addr);
    println!("   Mode: {}", config.settings.mode);
    println!("   Gemini API: {}", client.base_url());
    if let Some(dir) = &config.gateway.request_log_dir {
        println!("   Request logs: {}", dir.display());
    }

    let server = WebServer::new(WebServerConfig {
        bind_addr: config.bind_addr,
        backend: Arc::new(client),
        settings: config.settings,
        session_ttl: config.session_ttl,
    });
    server.start().await?;

    Ok(())
}
