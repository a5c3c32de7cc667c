//! Swingalyze client
//!
//! Usage: `swingalyze [CONFIG]` (default `swingalyze.toml`). Controls are read
//! from stdin, one per line: `load <path>`, `demo`, `play`, `reset`,
//! `overlay`, `mirror`, `slow`, `resize <w> <h>`, `quit`.

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use std::io::BufRead;
use std::path::PathBuf;
use swingalyze::app::actions::Action;
use swingalyze::app::init::spawn_estimator;
use swingalyze::app::{pump, App};
use swingalyze::config::{AppConfig, DEFAULT_CONFIG_FILE};
use swingalyze_control::logging_setup;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!("Fatal: {:#}", e);
        eprintln!("swingalyze: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let config = AppConfig::load(&config_path)?;
    let _log_guard = logging_setup::init(&config.logging)?;
    info!("Swingalyze starting with {:?}", config_path);

    let (action_tx, action_rx) = crossbeam_channel::unbounded();
    spawn_input_reader(action_tx).context("Failed to start input reader")?;

    let estimator_rx = spawn_estimator(config.estimator.clone());
    let app = App::new(config, action_rx, estimator_rx)?;
    pump::run(app).await
}

/// Read control lines from stdin on a dedicated thread
fn spawn_input_reader(tx: Sender<Action>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("stdin-controls".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("Failed to read control input: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Action>() {
                    Ok(action) => {
                        if tx.send(action).is_err() {
                            return;
                        }
                    }
                    Err(e) => warn!("Ignoring '{}': {}", line.trim(), e),
                }
            }
            let _ = tx.send(Action::InputClosed);
        })
        .map(|_| ())
}
