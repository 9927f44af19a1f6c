//! Server-rendered chat page.

use brochat_types::{BroIcon, ConversationEntry, Notice, NoticeLevel, Role};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write;

use crate::chat::{HandshakePhase, SessionState};
use crate::config::ConfigMode;
use crate::web::markdown::{render_markdown, render_plain};
use crate::web::session_manager::SessionId;

const USER_AVATAR: &str = "🧑";

const PAGE_STYLE: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: "Source Sans Pro", system-ui, sans-serif; background: #0e1117; color: #fafafa; display: flex; min-height: 100vh; }
aside { width: 320px; background: #262730; padding: 1.5rem; flex-shrink: 0; }
aside h1 { font-size: 1.6rem; margin-top: 0; }
aside h3 { margin-bottom: 0.5rem; }
aside hr { border: none; border-top: 1px solid #444; margin: 1.2rem 0; }
aside select, aside input[type=password], aside input[type=file] { width: 100%; padding: 0.4rem; margin-bottom: 0.5rem; background: #0e1117; color: #fafafa; border: 1px solid #555; border-radius: 6px; }
aside button { width: 100%; padding: 0.5rem; background: #0e1117; color: #fafafa; border: 1px solid #555; border-radius: 6px; cursor: pointer; }
aside button:hover { border-color: #ff4b4b; color: #ff4b4b; }
aside img { width: 100%; border-radius: 6px; margin: 0.5rem 0; }
aside .caption { font-size: 0.8rem; color: #aaa; text-align: center; }
main { flex: 1; max-width: 760px; margin: 0 auto; padding: 2rem 1.5rem 7rem; }
.notice { padding: 0.8rem 1rem; border-radius: 6px; margin-bottom: 1rem; }
.notice.error { background: rgba(255, 75, 75, 0.15); color: #ff8c8c; }
.notice.success { background: rgba(33, 195, 84, 0.15); color: #7ee2a0; }
.notice.info { background: rgba(28, 131, 225, 0.15); color: #8cc4ff; }
.message { display: flex; gap: 0.8rem; padding: 0.8rem 0; }
.avatar { font-size: 1.6rem; width: 2.2rem; text-align: center; flex-shrink: 0; }
.content { flex: 1; line-height: 1.5; overflow-wrap: anywhere; }
.content p:first-child { margin-top: 0.2rem; }
.message.assistant { background: rgba(38, 39, 48, 0.5); border-radius: 8px; padding: 0.8rem; }
form.chat-input { position: fixed; bottom: 1.5rem; left: calc(320px + (100% - 320px - 760px) / 2); width: 760px; max-width: calc(100% - 340px); display: flex; }
form.chat-input input { flex: 1; padding: 0.8rem 1rem; background: #262730; color: #fafafa; border: 1px solid cyan; border-radius: 8px; font-size: 1rem; }
form.chat-input input:focus { outline: none; border-color: cyan; box-shadow: 0 0 0 1px cyan; }
"#;

/// Everything the page needs, captured while the session lock is held
pub struct PageView {
    pub session_id: SessionId,
    pub mode: ConfigMode,
    pub history: Vec<ConversationEntry>,
    pub icon: BroIcon,
    pub phase: HandshakePhase,
    pub model: Option<String>,
    pub image: Option<ImagePreview>,
    pub notices: Vec<Notice>,
}

pub struct ImagePreview {
    pub file_name: Option<String>,
}

impl PageView {
    /// Snapshot `state`, draining its pending notices
    pub fn capture(session_id: SessionId, mode: ConfigMode, state: &mut SessionState) -> Self {
        Self {
            session_id,
            mode,
            history: state.history().to_vec(),
            icon: state.bro_icon,
            phase: state.backend.phase(),
            model: state.ready_backend().map(|h| h.model.clone()),
            image: state.uploaded_image.as_ref().map(|img| ImagePreview {
                file_name: img.file_name.clone(),
            }),
            notices: state.take_notices(),
        }
    }
}

pub fn render_page(view: &PageView) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Bro Chatbot</title>
<link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>😎</text></svg>">
<style>{}</style>
</head>
<body>
"#,
        PAGE_STYLE
    );
    render_sidebar(&mut html, view);
    render_main(&mut html, view);
    html.push_str("</body>\n</html>\n");
    html
}

fn render_sidebar(html: &mut String, view: &PageView) {
    let base = format!("/session/{}", view.session_id);
    html.push_str("<aside>\n<h1>⚙️ Settings</h1>\n<hr>\n");

    // Icon selector
    let _ = write!(
        html,
        r#"<h3>🎭 Choose Your Bro</h3>
<form method="post" action="{}/icon">
<select name="icon" aria-label="Select Bro Icon" onchange="this.form.submit()">
"#,
        base
    );
    for icon in BroIcon::ALL {
        let selected = if icon == view.icon { " selected" } else { "" };
        let _ = writeln!(
            html,
            r#"<option value="{}"{}>{}</option>"#,
            icon.key(),
            selected,
            text(icon.label())
        );
    }
    let _ = write!(
        html,
        "</select>\n<noscript><button type=\"submit\">Apply</button></noscript>\n</form>\n<p>Current Bro: {}</p>\n<hr>\n",
        view.icon.glyph()
    );

    // Credential form
    if view.mode == ConfigMode::Manual {
        let status = match (&view.phase, &view.model) {
            (HandshakePhase::Ready, Some(model)) => {
                format!("<p class=\"caption\">Connected: {}</p>\n", text(model))
            }
            _ => String::new(),
        };
        let _ = write!(
            html,
            r#"<h3>🔑 API Key</h3>
<form method="post" action="{}/credential">
<input type="password" name="api_key" placeholder="Enter your Gemini API key" autocomplete="off">
<button type="submit">Set API Key</button>
</form>
{}<hr>
"#,
            base, status
        );
    }

    let _ = write!(
        html,
        r#"<form method="post" action="{}/clear"><button type="submit">🗑️ Clear Chat History</button></form>
<hr>
<h3>🖼️ Image Upload</h3>
<form method="post" action="{}/image" enctype="multipart/form-data">
<label for="image">Upload an image for Bro to check out</label>
<input id="image" type="file" name="image" accept=".png,.jpg,.jpeg,.gif,.webp,image/png,image/jpeg,image/gif,image/webp" title="Upload an image and Bro will tell you what he sees!">
<button type="submit">Upload</button>
</form>
"#,
        base, base
    );

    if let (Some(preview), HandshakePhase::Ready) = (&view.image, view.phase) {
        let caption = preview.file_name.as_deref().unwrap_or("Uploaded Image");
        let _ = write!(
            html,
            r#"<img src="{}/image" alt="{}">
<p class="caption">{}</p>
<form method="post" action="{}/analyze"><button type="submit">🔍 Ask Bro to Check It</button></form>
"#,
            base,
            attr(caption),
            text(caption),
            base
        );
    }

    html.push_str(
        r#"<hr>
<h3>📖 How to Use</h3>
<ol>
<li>Choose your Bro icon above</li>
<li>Start chatting with Bro!</li>
<li>Upload an image for Bro to check out</li>
<li>Type "exit" to end the conversation</li>
</ol>
</aside>
"#,
    );
}

fn render_main(html: &mut String, view: &PageView) {
    html.push_str("<main>\n<h1>💬 Bro Chatbot</h1>\n<p>Chat with your chill Bro!</p>\n");

    for notice in &view.notices {
        let class = match notice.level {
            NoticeLevel::Error => "error",
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
        };
        let _ = writeln!(
            html,
            r#"<div class="notice {}" role="status">{}</div>"#,
            class,
            text(&notice.text)
        );
    }

    if view.phase != HandshakePhase::Ready {
        let hint = match view.mode {
            ConfigMode::Manual => "Bro is not available right now. Enter your Gemini API key in the sidebar to get started.",
            ConfigMode::Auto => "Bro is not available right now. Please try again later.",
        };
        let _ = writeln!(html, r#"<div class="notice info">{}</div>"#, hint);
    }

    for entry in &view.history {
        let (class, avatar, body) = match entry.role {
            Role::User => ("user", USER_AVATAR, render_plain(&entry.content)),
            Role::Assistant => ("assistant", view.icon.glyph(), render_markdown(&entry.content)),
        };
        let _ = write!(
            html,
            r#"<div class="message {}"><div class="avatar">{}</div><div class="content">{}</div></div>
"#,
            class, avatar, body
        );
    }

    let _ = write!(
        html,
        r#"<form class="chat-input" method="post" action="/session/{}/chat">
<input type="text" name="message" placeholder="Type your message..." autocomplete="off" autofocus>
</form>
</main>
"#,
        view.session_id
    );
}
