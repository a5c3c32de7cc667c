//! Logging configuration shared by the client and the server binaries

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level: trace, debug, info, warn or error
    pub level: String,
    /// Directory receiving log files
    pub log_path: PathBuf,
    /// Log files kept when cleaning up; 0 keeps everything
    pub max_files: usize,
    pub console_output: bool,
    pub file_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_path: PathBuf::from("logs"),
            max_files: 10,
            console_output: true,
            file_output: false,
        }
    }
}

impl LogConfig {
    /// Parse `level`, falling back to INFO for unknown values
    pub fn parse_level(&self) -> tracing::Level {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "warn" | "warning" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }

    pub fn ensure_log_directory(&self) -> std::io::Result<()> {
        if !self.file_output {
            return Ok(());
        }
        std::fs::create_dir_all(&self.log_path)
    }

    /// Path of the log file for a run started now
    pub fn current_log_path(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
        self.log_path.join(format!("swingalyze_{}.log", stamp))
    }

    /// Remove the oldest `.log` files so at most `max_files - 1` remain,
    /// leaving room for the file about to be created
    pub fn cleanup_old_logs(&self) -> std::io::Result<usize> {
        if self.max_files == 0 || !self.log_path.is_dir() {
            return Ok(0);
        }

        let mut logs = collect_logs(&self.log_path)?;
        let keep = self.max_files.saturating_sub(1);
        if logs.len() <= keep {
            return Ok(0);
        }

        logs.sort_by(|a, b| a.1.cmp(&b.1));
        let excess = logs.len() - keep;
        let mut removed = 0;
        for (path, _) in logs.into_iter().take(excess) {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("Could not remove old log {:?}: {}", path, e),
            }
        }
        Ok(removed)
    }
}

fn collect_logs(dir: &Path) -> std::io::Result<Vec<(PathBuf, std::time::SystemTime)>> {
    let mut logs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("log") {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        logs.push((path, modified));
    }
    Ok(logs)
}
