//! Axum HTTP server

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    Router,
};
use serde::{Deserialize, Serialize};
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use swingalyze_core::LogConfig;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes::build_router;
use crate::{error::ControlError, Result};

/// Environment variable overriding the configured port
pub const PORT_ENV: &str = "PORT";

/// Listener and static root settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebServerConfig {
    pub host: String,
    /// First port tried; taken ports are skipped upward
    pub port: u16,
    /// Directory holding the static client files
    pub root: PathBuf,
    pub enable_cors: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            // Bind to localhost unless configured otherwise
            host: "127.0.0.1".to_string(),
            port: 3000,
            root: PathBuf::from("public"),
            enable_cors: false,
        }
    }
}

impl WebServerConfig {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    pub fn with_host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    pub fn with_root(mut self, root: PathBuf) -> Self {
        self.root = root;
        self
    }

    pub fn with_cors(mut self, enable: bool) -> Self {
        self.enable_cors = enable;
        self
    }

    /// Apply a `PORT` value from the environment, ignoring unparsable values
    pub fn apply_port_override(&mut self, value: Option<&str>) {
        let Some(value) = value else {
            return;
        };
        match value.trim().parse::<u16>() {
            Ok(port) => self.port = port,
            Err(_) => tracing::warn!("Ignoring invalid {} value {:?}", PORT_ENV, value),
        }
    }
}

/// Contents of `swingalyze-server.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub server: WebServerConfig,
    pub logging: LogConfig,
}

impl ServerSettings {
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(swingalyze_core::config::load_or_default(path)?)
    }
}

/// Bind `host:start_port`, moving to the next port while the current one is
/// in use. Any other bind error is returned as is.
pub async fn bind_with_retry(host: &str, start_port: u16) -> Result<TcpListener> {
    let mut port = start_port;
    loop {
        let addr = format!("{}:{}", host, port);
        match TcpListener::bind(addr.as_str()).await {
            Ok(listener) => {
                let local = listener.local_addr()?;
                tracing::info!("Server running at http://{}", local);
                return Ok(listener);
            }
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                let next = port
                    .checked_add(1)
                    .ok_or(ControlError::PortsExhausted { start: start_port })?;
                tracing::warn!("Port {} in use, trying {}", port, next);
                port = next;
            }
            Err(source) => return Err(ControlError::Bind { addr, source }),
        }
    }
}

/// Static asset server
pub struct WebServer {
    config: WebServerConfig,
}

impl WebServer {
    pub fn new(config: WebServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WebServerConfig {
        &self.config
    }

    /// Router with middleware applied
    pub fn app(&self) -> Router {
        let app = build_router(&self.config.root)
            .layer(middleware::from_fn(security_headers))
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            app.layer(
                CorsLayer::new()
                    .allow_methods([Method::GET, Method::HEAD])
                    .allow_origin(Any),
            )
        } else {
            app
        }
    }

    /// Bind with port retry and serve until the listener fails
    pub async fn run(self) -> Result<()> {
        if !self.config.root.is_dir() {
            tracing::warn!(
                "Static root {:?} is not a directory; only /healthz will answer",
                self.config.root
            );
        }
        let listener = bind_with_retry(&self.config.host, self.config.port).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let addr: Option<SocketAddr> = listener.local_addr().ok();
        tracing::debug!("Serving {:?} on {:?}", self.config.root, addr);
        axum::serve(listener, self.app().into_make_service())
            .await
            .map_err(|e| ControlError::HttpError(format!("Server error: {}", e)))
    }

    /// Run on a tokio task; the handle resolves when serving stops
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}

/// Adds nosniff, frame-deny and no-referrer headers to every response
async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );

    response
}
