//! Pose estimation adapter
//!
//! Pose estimation itself is an external capability. Anything that can turn a
//! decoded frame into one landmark set sits behind [`PoseEstimator`];
//! construction goes through [`EstimatorInit::initialize`], which may fail.
//! The frame loop holds the estimator in an [`EstimatorSlot`] and skips
//! estimation until the slot is ready.

mod replay;

pub use replay::{LandmarkReplayEstimator, LandmarkTrack, TrackFrame};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::frame::VideoFrame;
use crate::landmark::LandmarkSet;

/// Estimator errors
#[derive(Error, Debug)]
pub enum EstimatorError {
    /// Model or landmark asset could not be read
    #[error("Failed to load model asset {path}: {source}")]
    AssetLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Asset was read but could not be parsed
    #[error("Invalid model asset: {0}")]
    InvalidAsset(String),

    /// Configuration rejected before loading
    #[error("Invalid estimator config: {0}")]
    InvalidConfig(String),
}

/// Inference delegate requested from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Delegate {
    Cpu,
    #[default]
    Gpu,
}

/// How the estimator receives frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunningMode {
    Image,
    #[default]
    Video,
}

/// Estimator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Path of the model asset (for the replay estimator: the landmark track)
    pub model_asset_path: PathBuf,
    pub delegate: Delegate,
    pub running_mode: RunningMode,
    /// Only single-person tracking is supported
    pub num_poses: u32,
    pub min_pose_detection_confidence: f32,
    pub min_pose_presence_confidence: f32,
    pub min_tracking_confidence: f32,
    pub output_segmentation_masks: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            model_asset_path: PathBuf::from("landmarks.json"),
            delegate: Delegate::Gpu,
            running_mode: RunningMode::Video,
            num_poses: 1,
            min_pose_detection_confidence: 0.5,
            min_pose_presence_confidence: 0.5,
            min_tracking_confidence: 0.5,
            output_segmentation_masks: false,
        }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<(), EstimatorError> {
        if self.num_poses != 1 {
            return Err(EstimatorError::InvalidConfig(format!(
                "num_poses must be 1 (single-person tracking), got {}",
                self.num_poses
            )));
        }
        for (name, value) in [
            ("min_pose_detection_confidence", self.min_pose_detection_confidence),
            ("min_pose_presence_confidence", self.min_pose_presence_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EstimatorError::InvalidConfig(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Per-frame pose detection
pub trait PoseEstimator: Send {
    /// Detect at most one pose in `frame`. `timestamp_ms` must be monotonic
    /// across calls. `None` means no pose was found.
    fn detect(&mut self, frame: &VideoFrame, timestamp_ms: f64) -> Option<LandmarkSet>;
}

/// Fallible construction of an estimator from configuration
pub trait EstimatorInit: Sized {
    fn initialize(config: &EstimatorConfig) -> Result<Self, EstimatorError>;
}

/// Availability of the estimator as seen by the frame loop
#[derive(Default)]
pub enum EstimatorSlot {
    /// Initialization still running
    #[default]
    Loading,
    Ready(Box<dyn PoseEstimator>),
    /// Initialization failed; frames are skipped for the rest of the process
    Unavailable(String),
}

impl EstimatorSlot {
    pub fn is_ready(&self) -> bool {
        matches!(self, EstimatorSlot::Ready(_))
    }

    pub fn get_mut(&mut self) -> Option<&mut dyn PoseEstimator> {
        match self {
            EstimatorSlot::Ready(estimator) => Some(estimator.as_mut()),
            _ => None,
        }
    }
}

impl fmt::Debug for EstimatorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimatorSlot::Loading => write!(f, "Loading"),
            EstimatorSlot::Ready(_) => write!(f, "Ready"),
            EstimatorSlot::Unavailable(reason) => write!(f, "Unavailable({})", reason),
        }
    }
}

impl<E: PoseEstimator + 'static> From<Result<E, EstimatorError>> for EstimatorSlot {
    fn from(result: Result<E, EstimatorError>) -> Self {
        match result {
            Ok(estimator) => EstimatorSlot::Ready(Box::new(estimator)),
            Err(e) => EstimatorSlot::Unavailable(e.to_string()),
        }
    }
}
