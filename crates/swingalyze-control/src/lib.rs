//! Swingalyze Control - Static Asset Server
//!
//! Serves the client's static files with a liveness probe:
//! - `GET /healthz` answers `{"ok":true}`
//! - every other path is resolved against the configured root
//! - binding walks upward from the configured port while ports are taken
//!
//! Also hosts the tracing subscriber setup shared by both binaries.

pub mod error;
pub mod logging_setup;
pub mod web;

pub use error::{ControlError, Result};
pub use web::{bind_with_retry, build_router, ServerSettings, WebServer, WebServerConfig};
