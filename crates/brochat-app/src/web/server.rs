use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use brochat_llm_api::GenerativeBackend;
use chrono::Duration;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerSettings;
use crate::web::{routes, session_manager::SessionManager};

/// Multipart framing on top of the raw image bytes
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

/// Web server configuration
pub struct WebServerConfig {
    pub bind_addr: SocketAddr,
    pub backend: Arc<dyn GenerativeBackend>,
    pub settings: ServerSettings,
    pub session_ttl: Option<Duration>,
}

/// Web server instance
pub struct WebServer {
    config: WebServerConfig,
    session_manager: Arc<SessionManager>,
}

impl WebServer {
    /// Create a new web server
    pub fn new(config: WebServerConfig) -> Self {
        let session_manager = Arc::new(SessionManager::new(config.session_ttl));

        Self {
            config,
            session_manager,
        }
    }

    /// Build the full application router, including layers
    pub fn router(&self) -> axum::Router {
        let app_state = routes::AppState {
            session_manager: self.session_manager.clone(),
            backend: self.config.backend.clone(),
            settings: Arc::new(self.config.settings.clone()),
        };

        let body_limit = self.config.settings.max_upload_bytes + UPLOAD_OVERHEAD_BYTES;

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(app_state)
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(cors)
    }

    /// Start the web server
    pub async fn start(self) -> Result<()> {
        let app = self.router();

        println!("🌐 Web server starting on http://{}", self.config.bind_addr);
        println!("   Chat page: http://{}/", self.config.bind_addr);
        println!("   API endpoints: http://{}/api/sessions", self.config.bind_addr);

        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn session_manager(&self) -> Arc<SessionManager> {
        self.session_manager.clone()
    }
}
