//! Static asset server for the Swingalyze client
//!
//! Usage: `swingalyze-server [CONFIG]` (default `swingalyze-server.toml`).
//! `PORT` overrides the configured start port.

use anyhow::{Context, Result};
use std::path::PathBuf;
use swingalyze_control::{logging_setup, web::server::PORT_ENV, ServerSettings, WebServer};

const DEFAULT_CONFIG: &str = "swingalyze-server.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!("Fatal: {:#}", e);
        eprintln!("swingalyze-server: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    let mut settings = ServerSettings::load_or_default(&config_path)
        .with_context(|| format!("Failed to load {:?}", config_path))?;
    let _log_guard = logging_setup::init(&settings.logging)?;

    let port_env = std::env::var(PORT_ENV).ok();
    settings.server.apply_port_override(port_env.as_deref());

    tracing::info!(
        "Serving {:?}, starting at port {}",
        settings.server.root,
        settings.server.port
    );
    WebServer::new(settings.server)
        .run()
        .await
        .context("Server failed")
}
