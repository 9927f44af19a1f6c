use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use brochat_llm_api::GenerativeBackend;
use brochat_types::{BroIcon, Notice};
use std::sync::Arc;

use crate::chat::{
    accept_upload, analyze_image, configure_from_secret, configure_with_credential,
    process_chat_turn, ImageError, SessionState,
};
use crate::config::{ConfigMode, ServerSettings};
use crate::web::{
    protocol::{ChatForm, CreateSessionRequest, CredentialForm, IconForm},
    render::{render_page, PageView},
    session_manager::{Session, SessionId, SessionManager},
};

/// Multipart field carrying the uploaded image
const IMAGE_FIELD: &str = "image";

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub session_manager: Arc<SessionManager>,
    pub backend: Arc<dyn GenerativeBackend>,
    pub settings: Arc<ServerSettings>,
}

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // API routes
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route(
            "/api/sessions/:id",
            get(get_session_details).delete(close_session),
        )
        // HTML pages and form actions
        .route("/", get(serve_index))
        .route("/session/:id", get(serve_session))
        .route("/session/:id/icon", post(select_icon))
        .route("/session/:id/credential", post(submit_credential))
        .route("/session/:id/clear", post(clear_history))
        .route("/session/:id/chat", post(submit_chat))
        .route("/session/:id/image", get(serve_image).post(upload_image))
        .route("/session/:id/analyze", post(analyze_uploaded_image))
        .with_state(state)
}

/// Fresh per-session state; auto mode is configured straight from the secret
fn initial_session_state(settings: &ServerSettings) -> SessionState {
    let mut state = SessionState::new();
    if settings.mode == ConfigMode::Auto {
        configure_from_secret(&mut state, settings.secret.as_deref(), &settings.fixed_model);
    }
    state
}

async fn new_session(state: &AppState) -> SessionId {
    state
        .session_manager
        .create_session(initial_session_state(&state.settings))
        .await
}

/// Look up a session from a raw path segment and mark it active
async fn find_session(state: &AppState, raw_id: &str) -> Option<Arc<Session>> {
    let id: SessionId = raw_id.parse().ok()?;
    let session = state.session_manager.get_session(&id).await?;
    session.update_activity().await;
    Some(session)
}

fn back_to(session: &Session) -> Redirect {
    Redirect::to(&format!("/session/{}", session.id))
}

// ============================================================================
// HTML pages
// ============================================================================

/// GET / - Start a new session
async fn serve_index(State(state): State<AppState>) -> Redirect {
    let session_id = new_session(&state).await;
    Redirect::to(&format!("/session/{}", session_id))
}

/// GET /session/:id - Render the chat page
async fn serve_session(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(session) = find_session(&state, &id).await else {
        return Redirect::to("/").into_response();
    };

    let view = {
        let mut chat = session.state.lock().await;
        PageView::capture(session.id, state.settings.mode, &mut chat)
    };
    Html(render_page(&view)).into_response()
}

/// POST /session/:id/icon
async fn select_icon(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<IconForm>,
) -> Redirect {
    let Some(session) = find_session(&state, &id).await else {
        return Redirect::to("/");
    };

    match form.icon.parse::<BroIcon>() {
        Ok(icon) => session.state.lock().await.set_icon(icon),
        Err(e) => log::warn!("Ignoring icon change: {}", e),
    }
    back_to(&session)
}

/// POST /session/:id/credential - Probe the submitted key
async fn submit_credential(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CredentialForm>,
) -> Redirect {
    let Some(session) = find_session(&state, &id).await else {
        return Redirect::to("/");
    };

    let mut chat = session.state.lock().await;
    if state.settings.mode == ConfigMode::Auto {
        chat.push_notice(Notice::info("The API key is managed by the server in auto mode."));
    } else {
        configure_with_credential(&mut chat, state.backend.as_ref(), &form.api_key).await;
    }
    drop(chat);

    back_to(&session)
}

/// POST /session/:id/clear
async fn clear_history(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let Some(session) = find_session(&state, &id).await else {
        return Redirect::to("/");
    };

    session.state.lock().await.clear_history();
    back_to(&session)
}

/// POST /session/:id/chat - Run one chat turn
async fn submit_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ChatForm>,
) -> Redirect {
    let Some(session) = find_session(&state, &id).await else {
        return Redirect::to("/");
    };

    let mut chat = session.state.lock().await;
    let outcome = process_chat_turn(&mut chat, state.backend.as_ref(), &form.message).await;
    drop(chat);

    log::debug!("Session {} turn: {:?}", session.id, outcome);
    back_to(&session)
}

/// POST /session/:id/image - Store an uploaded image (multipart)
async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Redirect {
    let Some(session) = find_session(&state, &id).await else {
        return Redirect::to("/");
    };

    let mut upload: Result<Option<(Option<String>, Vec<u8>)>, ImageError> = Ok(None);
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(IMAGE_FIELD) => {
                let file_name = field.file_name().map(str::to_string);
                upload = match field.bytes().await {
                    Ok(bytes) => Ok(Some((file_name, bytes.to_vec()))),
                    Err(e) => Err(upload_error(e.status(), &state.settings)),
                };
                break;
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => {
                upload = Err(upload_error(e.status(), &state.settings));
                break;
            }
        }
    }

    let mut chat = session.state.lock().await;
    let result = upload.and_then(|maybe| match maybe {
        Some((file_name, bytes)) => {
            accept_upload(&mut chat, file_name, bytes, state.settings.max_upload_bytes)
        }
        None => Err(ImageError::Empty),
    });
    if let Err(e) = result {
        log::info!("Rejected upload for session {}: {}", session.id, e);
        chat.push_notice(Notice::error(e.to_string()));
    }
    drop(chat);

    back_to(&session)
}

fn upload_error(status: StatusCode, settings: &ServerSettings) -> ImageError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ImageError::TooLarge {
            limit_mb: settings.max_upload_bytes / (1024 * 1024),
        }
    } else {
        ImageError::Empty
    }
}

/// GET /session/:id/image - Serve the pending upload for the preview
async fn serve_image(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(session) = find_session(&state, &id).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let chat = session.state.lock().await;
    match &chat.uploaded_image {
        Some(image) => (
            [
                (header::CONTENT_TYPE, image.mime_type()),
                (header::CACHE_CONTROL, "no-store"),
            ],
            image.bytes.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// POST /session/:id/analyze - Ask the model about the pending image
async fn analyze_uploaded_image(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let Some(session) = find_session(&state, &id).await else {
        return Redirect::to("/");
    };

    let mut chat = session.state.lock().await;
    let outcome = analyze_image(&mut chat, state.backend.as_ref()).await;
    drop(chat);

    log::debug!("Session {} image analysis: {:?}", session.id, outcome);
    back_to(&session)
}

// ============================================================================
// JSON API
// ============================================================================

/// GET /api/sessions - List all active sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.session_manager.list_sessions().await;
    Json(serde_json::json!({ "sessions": sessions }))
}

/// POST /api/sessions - Create a new session
async fn create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let request: CreateSessionRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateSessionRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    let mut session_state = initial_session_state(&state.settings);
    if let Some(raw) = request.bro_icon {
        let icon = raw
            .parse::<BroIcon>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        session_state.set_icon(icon);
    }

    let session_id = state.session_manager.create_session(session_state).await;

    Ok(Json(serde_json::json!({
        "session_id": session_id,
        "created_at": chrono::Utc::now().to_rfc3339(),
        "url": format!("/session/{}", session_id),
    })))
}

/// GET /api/sessions/:id - Get session details and history
async fn get_session_details(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = state
        .session_manager
        .get_session(&id)
        .await
        .ok_or_else(|| AppError::NotFound("Session not found".into()))?;

    let info = session.get_info().await;
    let history = session.state.lock().await.history().to_vec();

    Ok(Json(serde_json::json!({
        "session": info,
        "messages": history,
    })))
}

/// DELETE /api/sessions/:id - Close a session
async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.session_manager.remove_session(&id).await {
        return Err(AppError::NotFound("Session not found".into()));
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Session closed successfully",
    })))
}

// Error handling
#[derive(Debug)]
enum AppError {
    NotFound(String),
    BadRequest(String),
    SerdeJson(serde_json::Error),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerdeJson(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::SerdeJson(err) => (StatusCode::BAD_REQUEST, err.to_string()),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::test_support::FakeBackend;
    use crate::web::server::{WebServer, WebServerConfig};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use brochat_llm_api::GatewayError;
    use brochat_types::Role;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];

    struct Harness {
        app: Router,
        manager: Arc<SessionManager>,
        backend: Arc<FakeBackend>,
    }

    fn harness(backend: FakeBackend, settings: ServerSettings) -> Harness {
        let backend = Arc::new(backend);
        let server = WebServer::new(WebServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            backend: backend.clone(),
            settings,
            session_ttl: None,
        });
        Harness {
            app: server.router(),
            manager: server.session_manager(),
            backend,
        }
    }

    fn manual() -> ServerSettings {
        ServerSettings::default()
    }

    fn auto(secret: Option<&str>) -> ServerSettings {
        ServerSettings {
            mode: ConfigMode::Auto,
            secret: secret.map(str::to_string),
            ..ServerSettings::default()
        }
    }

    impl Harness {
        async fn send(&self, request: Request<Body>) -> Response {
            self.app.clone().oneshot(request).await.unwrap()
        }

        async fn open_session(&self) -> String {
            let response = self
                .send(Request::get("/").body(Body::empty()).unwrap())
                .await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            location(&response)
        }

        async fn post_form(&self, uri: &str, body: &str) -> Response {
            self.send(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
        }

        async fn page(&self, uri: &str) -> String {
            let response = self.send(Request::get(uri).body(Body::empty()).unwrap()).await;
            assert_eq!(response.status(), StatusCode::OK);
            body_string(response).await
        }

        async fn state_of(&self, uri: &str) -> Arc<Session> {
            let id: SessionId = uri.trim_start_matches("/session/").parse().unwrap();
            self.manager.get_session(&id).await.unwrap()
        }
    }

    fn location(response: &Response) -> String {
        response.headers()[header::LOCATION].to_str().unwrap().to_string()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn multipart_request(uri: &str, file_name: &str, content: &[u8]) -> Request<Body> {
        let boundary = "brochatboundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{f}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                b = boundary,
                f = file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_creates_session_and_redirects() {
        let h = harness(FakeBackend::replying("yo"), manual());
        let uri = h.open_session().await;

        assert!(uri.starts_with("/session/"));
        assert_eq!(h.manager.session_count().await, 1);

        let html = h.page(&uri).await;
        assert!(html.contains("💬 Bro Chatbot"));
        assert!(html.contains("Enter your Gemini API key"));
    }

    #[tokio::test]
    async fn test_unknown_session_redirects_home() {
        let h = harness(FakeBackend::replying("yo"), manual());
        for uri in ["/session/not-a-uuid", "/session/00000000-0000-0000-0000-000000000000"] {
            let response = h.send(Request::get(uri).body(Body::empty()).unwrap()).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), "/");
        }
    }

    #[tokio::test]
    async fn test_credential_then_chat() {
        let h = harness(
            FakeBackend::replying("Not much, bro!").with_models(&[
                "gemini-pro-vision",
                "gemini-1.5-flash",
                "gemini-1.5-pro",
            ]),
            manual(),
        );
        let uri = h.open_session().await;

        let response = h
            .post_form(&format!("{}/credential", uri), "api_key=secret-key")
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), uri);

        let response = h.post_form(&format!("{}/chat", uri), "message=sup").await;
        assert_eq!(location(&response), uri);

        let session = h.state_of(&uri).await;
        {
            let chat = session.state.lock().await;
            assert_eq!(chat.ready_backend().unwrap().model, "gemini-1.5-flash");
            assert_eq!(chat.history().len(), 2);
            assert_eq!(chat.history()[1].content, "Not much, bro!");
        }

        let html = h.page(&uri).await;
        assert!(html.contains("Not much, bro!"));
        assert!(!html.contains("secret-key"));

        let prompts: Vec<String> = h.backend.text_calls().into_iter().map(|c| c.prompt).collect();
        assert_eq!(prompts, vec!["Hello", "sup"]);
    }

    #[tokio::test]
    async fn test_chat_before_configuration_changes_nothing() {
        let h = harness(FakeBackend::replying("yo"), manual());
        let uri = h.open_session().await;

        h.post_form(&format!("{}/chat", uri), "message=hello").await;

        let session = h.state_of(&uri).await;
        assert!(session.state.lock().await.history().is_empty());
        assert!(h.backend.text_calls().is_empty());
        assert!(h.page(&uri).await.contains("Bro is not available right now."));
    }

    #[tokio::test]
    async fn test_exit_and_clear() {
        let h = harness(FakeBackend::replying("yo"), auto(Some("server-key")));
        let uri = h.open_session().await;

        h.post_form(&format!("{}/chat", uri), "message=EXIT").await;
        let session = h.state_of(&uri).await;
        {
            let chat = session.state.lock().await;
            assert_eq!(chat.history().len(), 2);
            assert_eq!(chat.history()[1].role, Role::Assistant);
            assert_eq!(chat.history()[1].content, brochat_types::FAREWELL_MESSAGE);
        }
        assert!(h.backend.text_calls().is_empty());

        h.post_form(&format!("{}/clear", uri), "").await;
        h.post_form(&format!("{}/clear", uri), "").await;
        assert!(session.state.lock().await.history().is_empty());
    }

    #[tokio::test]
    async fn test_auto_mode_uses_fixed_model_without_probe() {
        let h = harness(FakeBackend::replying("yo"), auto(Some("server-key")));
        let uri = h.open_session().await;

        h.post_form(&format!("{}/chat", uri), "message=hey").await;

        let calls = h.backend.text_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "gemini-1.5-flash");
        assert_eq!(calls[0].credential, "server-key");
        assert!(!h.page(&uri).await.contains("type=\"password\""));
    }

    #[tokio::test]
    async fn test_auto_mode_without_secret_reports_missing_key() {
        let h = harness(FakeBackend::replying("yo"), auto(None));
        let uri = h.open_session().await;

        let html = h.page(&uri).await;
        assert!(html.contains("API key not found! Please configure GEMINI_API_KEY in secrets."));
    }

    #[tokio::test]
    async fn test_icon_selection() {
        let h = harness(FakeBackend::replying("yo"), manual());
        let uri = h.open_session().await;

        h.post_form(&format!("{}/icon", uri), "icon=rock").await;
        h.post_form(&format!("{}/icon", uri), "icon=wizard").await;

        let session = h.state_of(&uri).await;
        assert_eq!(session.state.lock().await.bro_icon, BroIcon::Rock);
    }

    #[tokio::test]
    async fn test_upload_preview_and_analyze() {
        let h = harness(FakeBackend::replying("Sick pic, bro"), auto(Some("server-key")));
        let uri = h.open_session().await;

        let response = h
            .send(multipart_request(&format!("{}/image", uri), "pic.png", PNG))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let preview = h
            .send(Request::get(format!("{}/image", uri)).body(Body::empty()).unwrap())
            .await;
        assert_eq!(preview.status(), StatusCode::OK);
        assert_eq!(preview.headers()[header::CONTENT_TYPE], "image/png");
        assert!(h.page(&uri).await.contains("🔍 Ask Bro to Check It"));

        h.post_form(&format!("{}/analyze", uri), "").await;

        let session = h.state_of(&uri).await;
        {
            let chat = session.state.lock().await;
            assert_eq!(chat.history().len(), 1);
            assert!(chat.history()[0].content.ends_with("Sick pic, bro"));
            assert!(chat.uploaded_image.is_none());
        }
        assert_eq!(h.backend.image_calls()[0].len, PNG.len());

        let gone = h
            .send(Request::get(format!("{}/image", uri)).body(Body::empty()).unwrap())
            .await;
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_images() {
        let h = harness(FakeBackend::replying("yo"), auto(Some("server-key")));
        let uri = h.open_session().await;

        h.send(multipart_request(&format!("{}/image", uri), "notes.txt", b"just text"))
            .await;

        let session = h.state_of(&uri).await;
        assert!(session.state.lock().await.uploaded_image.is_none());
        assert!(h.page(&uri).await.contains("look like an image"));
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected_at_body_limit() {
        let settings = ServerSettings {
            max_upload_bytes: 1024 * 1024,
            ..auto(Some("server-key"))
        };
        let h = harness(FakeBackend::replying("yo"), settings);
        let uri = h.open_session().await;

        let mut big = PNG.to_vec();
        big.resize(2 * 1024 * 1024, 0);
        let response = h
            .send(multipart_request(&format!("{}/image", uri), "huge.png", &big))
            .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), uri);
        let session = h.state_of(&uri).await;
        assert!(session.state.lock().await.uploaded_image.is_none());
        assert!(h.page(&uri).await.contains("too big"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_turns_on_one_session_are_serialized() {
        let h = harness(FakeBackend::replying("Got you, bro"), auto(Some("server-key")));
        let uri = h.open_session().await;
        const TURNS: usize = 20;

        let mut tasks = Vec::new();
        for i in 0..TURNS {
            let app = h.app.clone();
            let request = Request::post(format!("{}/chat", uri))
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!("message=turn{}", i)))
                .unwrap();
            tasks.push(tokio::spawn(async move { app.oneshot(request).await.unwrap() }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap().status(), StatusCode::SEE_OTHER);
        }

        let session = h.state_of(&uri).await;
        let chat = session.state.lock().await;
        let history = chat.history();
        assert_eq!(history.len(), 2 * TURNS);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert!(pair[0].content.starts_with("turn"));
            assert_eq!(pair[1].role, Role::Assistant);
            assert_eq!(pair[1].content, "Got you, bro");
        }

        let mut sent: Vec<String> = h.backend.text_calls().into_iter().map(|c| c.prompt).collect();
        sent.sort();
        sent.dedup();
        assert_eq!(sent.len(), TURNS);
    }

    #[tokio::test]
    async fn test_failed_analysis_keeps_history_empty() {
        let h = harness(
            FakeBackend::failing(GatewayError::Transport("connection reset".into())),
            auto(Some("server-key")),
        );
        let uri = h.open_session().await;

        h.send(multipart_request(&format!("{}/image", uri), "pic.png", PNG))
            .await;
        h.post_form(&format!("{}/analyze", uri), "").await;

        let session = h.state_of(&uri).await;
        {
            let chat = session.state.lock().await;
            assert!(chat.history().is_empty());
            assert!(chat.uploaded_image.is_some());
        }
        assert!(h.page(&uri).await.contains("Error analyzing image: "));
    }

    #[tokio::test]
    async fn test_json_session_api() {
        let h = harness(FakeBackend::replying("yo"), manual());

        let response = h
            .send(
                Request::post("/api/sessions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"bro_icon":"gamer"}"#))
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let created: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        let id = created["session_id"].as_str().unwrap().to_string();

        let response = h
            .send(Request::get("/api/sessions").body(Body::empty()).unwrap())
            .await;
        let listed: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(listed["sessions"].as_array().unwrap().len(), 1);
        assert_eq!(listed["sessions"][0]["bro_icon"], "gamer");
        assert_eq!(listed["sessions"][0]["backend"], "unconfigured");

        let response = h
            .send(Request::get(format!("/api/sessions/{}", id)).body(Body::empty()).unwrap())
            .await;
        let details: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(details["messages"], serde_json::json!([]));

        let response = h
            .send(Request::delete(format!("/api/sessions/{}", id)).body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = h
            .send(Request::get(format!("/api/sessions/{}", id)).body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(error["status"], 404);
    }

    #[tokio::test]
    async fn test_json_create_rejects_bad_input() {
        let h = harness(FakeBackend::replying("yo"), manual());

        let response = h
            .send(
                Request::post("/api/sessions")
                    .body(Body::from(r#"{"bro_icon":"wizard"}"#))
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = h
            .send(Request::post("/api/sessions").body(Body::from("{not json")).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = h
            .send(Request::post("/api/sessions").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(h.manager.session_count().await, 1);
    }
}
