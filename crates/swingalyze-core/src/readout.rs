//! Readout fields shown next to the video, and the FPS meter feeding them

use serde::{Deserialize, Serialize};

use crate::measure::Measurements;

/// Text shown for a value that is not known
pub const PLACEHOLDER: &str = "\u{2013}";

/// Minimum interval between FPS samples, milliseconds
pub const FPS_SAMPLE_INTERVAL_MS: f64 = 250.0;

/// Formatted readout fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readouts {
    pub fps: String,
    pub spine_deg: String,
    pub head_move_px: String,
    pub sway_px: String,
    pub knee_flex_deg: String,
    pub x_factor_deg: String,
}

impl Default for Readouts {
    fn default() -> Self {
        Self {
            fps: PLACEHOLDER.to_string(),
            spine_deg: PLACEHOLDER.to_string(),
            head_move_px: PLACEHOLDER.to_string(),
            sway_px: PLACEHOLDER.to_string(),
            knee_flex_deg: PLACEHOLDER.to_string(),
            x_factor_deg: PLACEHOLDER.to_string(),
        }
    }
}

impl Readouts {
    /// Update the measurement fields, leaving the FPS field untouched
    pub fn set_measurements(&mut self, m: &Measurements) {
        self.spine_deg = format_value(m.spine_angle, 1);
        self.head_move_px = format_value(m.head_drift_px, 0);
        self.sway_px = format_value(m.pelvis_drift_px, 0);
        self.knee_flex_deg = format_value(m.knee_flex, 1);
        self.x_factor_deg = format_value(m.x_factor, 1);
    }

    pub fn set_fps(&mut self, fps: f64) {
        self.fps = format!("{:.1}", fps);
    }

    /// True when every field shows the placeholder
    pub fn is_cleared(&self) -> bool {
        *self == Self::default()
    }
}

/// Fixed-precision number, or the placeholder for unknown/non-finite values
pub fn format_value(value: Option<f32>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", precision, v),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Throttled frames-per-second estimate
///
/// A new sample is taken only when at least [`FPS_SAMPLE_INTERVAL_MS`] passed
/// since the previous one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FpsMeter {
    last_sample_ms: f64,
    fps: Option<f64>,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame timestamp; returns the new estimate when one was taken
    pub fn tick(&mut self, timestamp_ms: f64) -> Option<f64> {
        let dt = timestamp_ms - self.last_sample_ms;
        if dt >= FPS_SAMPLE_INTERVAL_MS {
            let fps = 1000.0 / dt.max(1.0);
            self.fps = Some(fps);
            self.last_sample_ms = timestamp_ms;
            Some(fps)
        } else {
            None
        }
    }

    pub fn current(&self) -> Option<f64> {
        self.fps
    }

    pub fn reset(&mut self) {
        self.fps = None;
    }
}
