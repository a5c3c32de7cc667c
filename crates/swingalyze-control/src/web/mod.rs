//! HTTP server and routes

pub mod routes;
pub mod server;

pub use routes::build_router;
pub use server::{bind_with_retry, ServerSettings, WebServer, WebServerConfig};
