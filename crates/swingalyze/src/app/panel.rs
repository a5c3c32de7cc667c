//! Coaching panel output: status line, readouts and the notes list.
//!
//! The panel is mirrored to files in the output directory:
//! `notes.html` holds the `<li>` note items and `panel.json` the rest.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use swingalyze_core::{Phase, Readouts, Session};

pub const NOTES_FILE: &str = "notes.html";
pub const PANEL_FILE: &str = "panel.json";

/// Snapshot of everything the panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelState {
    pub status: String,
    pub play_label: &'static str,
    pub phase: Phase,
    pub readouts: Readouts,
    pub notes_html: String,
}

impl PanelState {
    pub fn capture(session: &Session, play_label: &'static str) -> Self {
        Self {
            status: session.status().to_string(),
            play_label,
            phase: session.phase(),
            readouts: session.readouts().clone(),
            notes_html: session.notes_html(),
        }
    }
}

/// Writes panel changes to disk and status changes to stdout
pub struct Panel {
    directory: PathBuf,
    last: Option<PanelState>,
}

impl Panel {
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        std::fs::create_dir_all(&directory)
            .with_context(|| format!("Failed to create output directory {:?}", directory))?;
        Ok(Self {
            directory,
            last: None,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Print a user-facing line
    pub fn say(&self, message: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", message) {
            tracing::debug!("stdout closed: {}", e);
        }
    }

    /// Publish `state` if it differs from the last published state.
    /// Returns whether anything was written.
    pub fn publish(&mut self, state: PanelState) -> Result<bool> {
        let previous = self.last.as_ref();
        if previous == Some(&state) {
            return Ok(false);
        }

        if previous.map(|p| &p.status) != Some(&state.status) {
            self.say(&state.status);
        }
        if previous.map(|p| &p.notes_html) != Some(&state.notes_html) {
            std::fs::write(self.directory.join(NOTES_FILE), &state.notes_html)
                .context("Failed to write notes")?;
        }
        let json = serde_json::to_string_pretty(&state)?;
        std::fs::write(self.directory.join(PANEL_FILE), json).context("Failed to write panel")?;

        self.last = Some(state);
        Ok(true)
    }
}
