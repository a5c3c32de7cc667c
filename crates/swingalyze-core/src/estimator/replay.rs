//! Landmark replay estimator
//!
//! Answers detections from a landmark track recorded by an external pose
//! tool. The track is a JSON document:
//!
//! ```json
//! { "frames": [ { "timestamp_ms": 0.0, "landmarks": [ {"x":0.5,"y":0.2,"z":0.0}, ... ] },
//!               { "timestamp_ms": 33.3, "landmarks": null } ] }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{EstimatorConfig, EstimatorError, EstimatorInit, PoseEstimator};
use crate::frame::VideoFrame;
use crate::landmark::LandmarkSet;

/// Slack when matching frame timestamps against track entries, milliseconds
const TIMESTAMP_SLACK_MS: f64 = 0.5;

/// One recorded detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFrame {
    pub timestamp_ms: f64,
    /// `None` when the recording found no person in this frame
    #[serde(default)]
    pub landmarks: Option<LandmarkSet>,
}

/// A recorded landmark track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkTrack {
    pub frames: Vec<TrackFrame>,
}

impl LandmarkTrack {
    pub fn from_json(json: &str) -> Result<Self, EstimatorError> {
        let mut track: LandmarkTrack =
            serde_json::from_str(json).map_err(|e| EstimatorError::InvalidAsset(e.to_string()))?;
        if track.frames.iter().any(|f| !f.timestamp_ms.is_finite()) {
            return Err(EstimatorError::InvalidAsset(
                "track contains a non-finite timestamp".to_string(),
            ));
        }
        track
            .frames
            .sort_by(|a, b| a.timestamp_ms.total_cmp(&b.timestamp_ms));
        Ok(track)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EstimatorError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| EstimatorError::AssetLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Latest entry at or before `timestamp_ms`
    pub fn at(&self, timestamp_ms: f64) -> Option<&TrackFrame> {
        let idx = self
            .frames
            .partition_point(|f| f.timestamp_ms <= timestamp_ms + TIMESTAMP_SLACK_MS);
        idx.checked_sub(1).map(|i| &self.frames[i])
    }
}

/// Estimator backed by a [`LandmarkTrack`]
///
/// Frames are matched by their presentation timestamp, so playback speed does
/// not change which landmarks are returned.
#[derive(Debug, Clone)]
pub struct LandmarkReplayEstimator {
    track: LandmarkTrack,
    min_presence: f32,
    last_timestamp_ms: f64,
}

impl LandmarkReplayEstimator {
    pub fn new(track: LandmarkTrack, min_presence: f32) -> Self {
        Self {
            track,
            min_presence,
            last_timestamp_ms: f64::NEG_INFINITY,
        }
    }

    /// Mean visibility of the set, if every landmark reports one
    fn presence(landmarks: &LandmarkSet) -> Option<f32> {
        if landmarks.is_empty() {
            return None;
        }
        let mut sum = 0.0;
        for lm in landmarks.iter() {
            sum += lm.visibility?;
        }
        Some(sum / landmarks.len() as f32)
    }
}

impl EstimatorInit for LandmarkReplayEstimator {
    fn initialize(config: &EstimatorConfig) -> Result<Self, EstimatorError> {
        config.validate()?;
        let track = LandmarkTrack::load(&config.model_asset_path)?;
        tracing::info!(
            "Landmark track loaded: {} frames from {}",
            track.frames.len(),
            config.model_asset_path.display()
        );
        Ok(Self::new(track, config.min_pose_presence_confidence))
    }
}

impl PoseEstimator for LandmarkReplayEstimator {
    fn detect(&mut self, frame: &VideoFrame, timestamp_ms: f64) -> Option<LandmarkSet> {
        if timestamp_ms < self.last_timestamp_ms {
            tracing::warn!(
                "Non-monotonic estimator timestamp {:.1} < {:.1}",
                timestamp_ms,
                self.last_timestamp_ms
            );
        }
        self.last_timestamp_ms = timestamp_ms;

        let landmarks = self.track.at(frame.pts_ms())?.landmarks.as_ref()?;
        match Self::presence(landmarks) {
            Some(presence) if presence < self.min_presence => None,
            _ => Some(landmarks.clone()),
        }
    }
}
