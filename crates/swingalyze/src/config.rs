//! Client configuration (`swingalyze.toml`)

use anyhow::{Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use swingalyze_core::{DisplayOptions, EstimatorConfig, LogConfig};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "swingalyze.toml";

/// Stage and toggle defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Display area the video is fitted into, pixels
    pub stage_width: f32,
    pub stage_height: f32,
    pub overlay: bool,
    pub mirror: bool,
    pub slow: bool,
    /// Frame loop rate
    pub tick_hz: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let options = DisplayOptions::default();
        Self {
            stage_width: 1280.0,
            stage_height: 720.0,
            overlay: options.overlay,
            mirror: options.mirror,
            slow: options.slow,
            tick_hz: 30.0,
        }
    }
}

impl DisplayConfig {
    pub fn stage(&self) -> Vec2 {
        Vec2::new(self.stage_width, self.stage_height)
    }

    pub fn options(&self) -> DisplayOptions {
        DisplayOptions {
            overlay: self.overlay,
            mirror: self.mirror,
            slow: self.slow,
        }
    }
}

/// Where the panel and overlay images are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    /// Write a numbered overlay PNG for every analyzed frame
    pub write_overlay_frames: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("swingalyze-out"),
            write_overlay_frames: false,
        }
    }
}

/// Contents of `swingalyze.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub estimator: EstimatorConfig,
    pub display: DisplayConfig,
    pub output: OutputConfig,
    pub logging: LogConfig,
}

impl AppConfig {
    /// Load from `path`; a missing file yields defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config: Self = swingalyze_core::config::load_or_default(path)
            .with_context(|| format!("Failed to load config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.display.tick_hz.is_finite() && self.display.tick_hz > 0.0,
            "display.tick_hz must be positive, got {}",
            self.display.tick_hz
        );
        anyhow::ensure!(
            self.display.stage_width >= 0.0 && self.display.stage_height >= 0.0,
            "display stage size must not be negative"
        );
        Ok(())
    }
}
