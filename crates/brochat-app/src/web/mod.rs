// Web frontend module
pub mod markdown;
pub mod protocol;
pub mod render;
pub mod routes;
pub mod server;
pub mod session_manager;

pub use protocol::SessionInfo;
pub use server::{WebServer, WebServerConfig};
pub use session_manager::{SessionId, SessionManager};
