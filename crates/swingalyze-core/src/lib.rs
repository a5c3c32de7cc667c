//! Swingalyze Core - Pose Geometry and Swing Coaching
//!
//! This crate contains the domain logic for Swingalyze, including:
//! - Landmark model and the estimator contract
//! - Contain-fit viewport mapping and mirroring
//! - Biomechanical measurements and the swing phase tracker
//! - Coaching notes, readouts and the per-frame session step

pub use glam::Vec2;
use std::path::PathBuf;
use thiserror::Error;

pub mod config;
pub mod estimator;
pub mod frame;
pub mod landmark;
pub mod logging;
pub mod measure;
pub mod notes;
pub mod phase;
pub mod readout;
pub mod session;
pub mod skeleton;
pub mod viewport;

// --- Re-exports grouped by category ---

// Estimation
pub use estimator::{
    Delegate, EstimatorConfig, EstimatorError, EstimatorInit, EstimatorSlot,
    LandmarkReplayEstimator, LandmarkTrack, PoseEstimator, RunningMode, TrackFrame,
};
pub use frame::VideoFrame;
pub use landmark::{Landmark, LandmarkIndex, LandmarkSet, LANDMARK_COUNT};

// Geometry
pub use viewport::{DrawRect, ProjectedPoint, ProjectedPose, Projector, FALLBACK_VIDEO_SIZE};
pub use skeleton::{skeleton_segments, SKELETON_CONNECTIONS};

// Analysis
pub use measure::{measure, Baseline, Measurements};
pub use notes::{dedupe_notes, escape_html, notes_to_html, MAX_NOTES};
pub use phase::{Note, NoteKind, Phase, PhaseTracker};
pub use readout::{FpsMeter, Readouts, PLACEHOLDER};
pub use session::{DisplayOptions, FrameAnalysis, FrameInput, Session, Status, TickOutcome};

// Logging
pub use logging::LogConfig;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// File system access failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file exists but is malformed
    #[error("Invalid config {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Estimator(#[from] EstimatorError),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
