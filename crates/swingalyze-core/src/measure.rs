//! Biomechanical measurements derived from projected landmarks
//!
//! All values are in canvas pixels or degrees. A measurement whose landmarks
//! are missing stays `None`; callers must treat it as unknown, never as zero.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::landmark::LandmarkIndex as L;
use crate::viewport::ProjectedPose;

/// Zero reference for drift measurements, captured once per session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Nose x at capture time
    pub head_x: f32,
    /// Hip-midpoint x at capture time
    pub pelvis_x: f32,
    /// Capture time in milliseconds
    pub captured_at_ms: f64,
}

impl Baseline {
    /// Capture from the current pose; needs both the nose and the hip midpoint
    pub fn capture(pose: &ProjectedPose, timestamp_ms: f64) -> Option<Self> {
        let nose = pose.get(L::Nose)?;
        let hip_mid = pose.midpoint(L::LeftHip, L::RightHip)?;
        Some(Self {
            head_x: nose.x,
            pelvis_x: hip_mid.x,
            captured_at_ms: timestamp_ms,
        })
    }
}

/// Per-frame measurement record
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    /// Tilt of hip-mid -> shoulder-mid against vertical, degrees
    pub spine_angle: Option<f32>,
    /// Nose displacement from baseline, pixels
    pub head_drift_px: Option<f32>,
    /// Hip-midpoint displacement from baseline, pixels
    pub pelvis_drift_px: Option<f32>,
    /// 180 minus the mean included knee angle, degrees
    pub knee_flex: Option<f32>,
    /// Shoulder-line vs hip-line separation ("X-factor"), degrees
    pub x_factor: Option<f32>,
}

/// Compute all measurements for one frame
pub fn measure(pose: &ProjectedPose, baseline: Option<&Baseline>) -> Measurements {
    let hip_mid = pose.midpoint(L::LeftHip, L::RightHip);
    let shoulder_mid = pose.midpoint(L::LeftShoulder, L::RightShoulder);
    let nose = pose.get(L::Nose);

    Measurements {
        spine_angle: spine_angle(hip_mid, shoulder_mid),
        head_drift_px: drift(nose, baseline.map(|b| b.head_x)),
        pelvis_drift_px: drift(hip_mid, baseline.map(|b| b.pelvis_x)),
        knee_flex: knee_flex(pose, hip_mid),
        x_factor: x_factor(pose),
    }
}

fn spine_angle(hip_mid: Option<Vec2>, shoulder_mid: Option<Vec2>) -> Option<f32> {
    let d = shoulder_mid? - hip_mid?;
    // atan2(dx, dy): angle against the vertical, sign gives tilt direction
    Some(d.x.atan2(d.y).to_degrees())
}

fn drift(point: Option<Vec2>, reference_x: Option<f32>) -> Option<f32> {
    Some(point?.x - reference_x?)
}

/// Direction of `to - from` in radians, `atan2(dy, dx)`
fn heading(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

fn knee_angle(hip_mid: Vec2, knee: Vec2, ankle: Vec2) -> f32 {
    let thigh = heading(hip_mid, knee);
    let shank = heading(knee, ankle);
    (shank - thigh).to_degrees().abs()
}

fn knee_flex(pose: &ProjectedPose, hip_mid: Option<Vec2>) -> Option<f32> {
    let hip_mid = hip_mid?;
    let left = knee_angle(hip_mid, pose.get(L::LeftKnee)?, pose.get(L::LeftAnkle)?);
    let right = knee_angle(hip_mid, pose.get(L::RightKnee)?, pose.get(L::RightAnkle)?);
    Some(180.0 - (left + right) / 2.0)
}

fn x_factor(pose: &ProjectedPose) -> Option<f32> {
    let shoulders = heading(pose.get(L::LeftShoulder)?, pose.get(L::RightShoulder)?);
    let hips = heading(pose.get(L::LeftHip)?, pose.get(L::RightHip)?);
    Some((shoulders - hips).to_degrees().abs())
}
