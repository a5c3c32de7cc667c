use glam::Vec2;

use crate::landmark::LandmarkIndex as L;
use crate::viewport::ProjectedPose;

/// Bone connections drawn on the overlay (start, end)
pub const SKELETON_CONNECTIONS: [(L, L); 12] = [
    // Torso
    (L::LeftShoulder, L::RightShoulder),
    (L::LeftShoulder, L::LeftHip),
    (L::RightShoulder, L::RightHip),
    (L::LeftHip, L::RightHip),
    // Arms
    (L::LeftShoulder, L::LeftElbow),
    (L::LeftElbow, L::LeftWrist),
    (L::RightShoulder, L::RightElbow),
    (L::RightElbow, L::RightWrist),
    // Legs
    (L::LeftHip, L::LeftKnee),
    (L::LeftKnee, L::LeftAnkle),
    (L::RightHip, L::RightKnee),
    (L::RightKnee, L::RightAnkle),
];

/// Stroke color (RGB)
pub const SKELETON_COLOR: u32 = 0x6FB1FC;

/// Stroke width in canvas pixels
pub const SKELETON_LINE_WIDTH: f32 = 2.0;

/// Stroke opacity
pub const SKELETON_ALPHA: f32 = 0.9;

/// Line segments to stroke for one pose.
///
/// Bones with a missing endpoint are skipped. A neck proxy from the shoulder
/// midpoint to the nose is appended when all three points exist.
pub fn skeleton_segments(pose: &ProjectedPose) -> Vec<(Vec2, Vec2)> {
    let mut segments: Vec<(Vec2, Vec2)> = SKELETON_CONNECTIONS
        .iter()
        .filter_map(|&(a, b)| Some((pose.get(a)?, pose.get(b)?)))
        .collect();

    if let (Some(shoulder_mid), Some(nose)) = (
        pose.midpoint(L::LeftShoulder, L::RightShoulder),
        pose.get(L::Nose),
    ) {
        segments.push((shoulder_mid, nose));
    }

    segments
}
