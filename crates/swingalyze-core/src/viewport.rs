//! Viewport mapping from video-native pixels to the overlay canvas
//!
//! The video is fitted into the stage with "contain" semantics (letterbox or
//! pillarbox, centered). Landmarks are projected into the fitted rectangle,
//! optionally mirrored left-right.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::landmark::{LandmarkIndex, LandmarkSet, LANDMARK_COUNT};

/// Fallback video size used before metadata is known
pub const FALLBACK_VIDEO_SIZE: Vec2 = Vec2::new(16.0, 9.0);

/// Letterboxed region of the stage the video occupies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawRect {
    /// Left offset inside the stage
    pub x: f32,
    /// Top offset inside the stage
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Displayed pixels per native video pixel (horizontal)
    pub scale_x: f32,
    /// Displayed pixels per native video pixel (vertical)
    pub scale_y: f32,
}

impl Default for DrawRect {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl DrawRect {
    /// Largest rectangle with the video's aspect ratio that fits in the stage,
    /// centered on both axes.
    ///
    /// Non-positive video dimensions fall back to [`FALLBACK_VIDEO_SIZE`]. An
    /// empty stage yields an empty rectangle.
    pub fn contain(stage: Vec2, video: Vec2) -> Self {
        let video = if video.x > f32::EPSILON && video.y > f32::EPSILON {
            video
        } else {
            FALLBACK_VIDEO_SIZE
        };

        if stage.x.abs() < f32::EPSILON || stage.y.abs() < f32::EPSILON {
            return Self::default();
        }

        let aspect_video = video.x / video.y;
        let aspect_stage = stage.x / stage.y;

        let (w, h) = if aspect_video > aspect_stage {
            (stage.x, stage.x / aspect_video)
        } else {
            (stage.y * aspect_video, stage.y)
        };

        Self {
            x: (stage.x - w) / 2.0,
            y: (stage.y - h) / 2.0,
            w,
            h,
            scale_x: w / video.x,
            scale_y: h / video.y,
        }
    }

    /// Canvas backing-store size in whole pixels
    pub fn canvas_size(&self) -> (u32, u32) {
        (js_round(self.w).max(0.0) as u32, js_round(self.h).max(0.0) as u32)
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}

/// A landmark mapped into canvas pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub pos: Vec2,
    /// Depth value passed through from the landmark
    pub z: f32,
}

/// Projected points of one frame, indexed like the landmark set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedPose {
    points: Vec<Option<ProjectedPoint>>,
}

impl ProjectedPose {
    pub fn new(points: Vec<Option<ProjectedPoint>>) -> Self {
        Self { points }
    }

    pub fn get(&self, index: LandmarkIndex) -> Option<Vec2> {
        self.point(index).map(|p| p.pos)
    }

    pub fn point(&self, index: LandmarkIndex) -> Option<&ProjectedPoint> {
        self.points.get(index as usize).and_then(|p| p.as_ref())
    }

    /// Midpoint of two landmarks, `None` if either is missing
    pub fn midpoint(&self, a: LandmarkIndex, b: LandmarkIndex) -> Option<Vec2> {
        Some((self.get(a)? + self.get(b)?) / 2.0)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Maps normalized landmarks into canvas space for one draw rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub rect: DrawRect,
    /// Native video size in pixels
    pub video_size: Vec2,
    pub mirror: bool,
}

impl Projector {
    pub fn new(rect: DrawRect, video_size: Vec2, mirror: bool) -> Self {
        Self {
            rect,
            video_size,
            mirror,
        }
    }

    /// Project a single normalized position, rounded to whole pixels
    pub fn project(&self, normalized: Vec2) -> Vec2 {
        let (sign, offset) = if self.mirror {
            (-1.0, self.rect.w)
        } else {
            (1.0, 0.0)
        };
        let x = normalized.x * self.video_size.x * self.rect.scale_x * sign + offset;
        let y = normalized.y * self.video_size.y * self.rect.scale_y;
        Vec2::new(js_round(x), js_round(y))
    }

    /// Project every landmark; missing landmarks stay missing
    pub fn project_all(&self, landmarks: &LandmarkSet) -> ProjectedPose {
        let count = landmarks.len().min(LANDMARK_COUNT);
        let points = LandmarkIndex::ALL[..count]
            .iter()
            .map(|&idx| {
                landmarks.get(idx).map(|lm| ProjectedPoint {
                    pos: self.project(Vec2::new(lm.x, lm.y)),
                    z: lm.z,
                })
            })
            .collect();
        ProjectedPose::new(points)
    }
}

/// Round half toward positive infinity, matching canvas pixel snapping
fn js_round(v: f32) -> f32 {
    (v + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Landmark;

    #[test]
    fn test_contain_wide_video_in_square_stage() {
        let rect = DrawRect::contain(Vec2::new(200.0, 200.0), Vec2::new(100.0, 50.0));
        assert_eq!(rect.w, 200.0);
        assert_eq!(rect.h, 100.0);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 50.0);
        assert_eq!(rect.scale_x, 2.0);
        assert_eq!(rect.scale_y, 2.0);
    }

    #[test]
    fn test_contain_tall_video_pillarboxes() {
        let rect = DrawRect::contain(Vec2::new(1280.0, 720.0), Vec2::new(1080.0, 1920.0));
        assert_eq!(rect.h, 720.0);
        assert!((rect.w - 405.0).abs() < 1e-3);
        assert!((rect.x - (1280.0 - 405.0) / 2.0).abs() < 1e-3);
        assert_eq!(rect.y, 0.0);
    }

    #[test]
    fn test_contain_unknown_video_uses_16_9() {
        let rect = DrawRect::contain(Vec2::new(1600.0, 1600.0), Vec2::ZERO);
        assert_eq!(rect.w, 1600.0);
        assert!((rect.h - 900.0).abs() < 1e-2);
        assert_eq!(rect.scale_x, 100.0);
    }

    #[test]
    fn test_contain_empty_stage() {
        let rect = DrawRect::contain(Vec2::new(0.0, 500.0), Vec2::new(640.0, 480.0));
        assert!(rect.is_empty());
        assert_eq!(rect.canvas_size(), (0, 0));
    }

    #[test]
    fn test_canvas_size_rounds() {
        let rect = DrawRect {
            w: 405.5,
            h: 719.4,
            ..Default::default()
        };
        assert_eq!(rect.canvas_size(), (406, 719));
    }

    #[test]
    fn test_project_plain_and_mirrored() {
        let video = Vec2::new(640.0, 480.0);
        let rect = DrawRect::contain(Vec2::new(320.0, 240.0), video);
        let plain = Projector::new(rect, video, false);
        let mirrored = Projector::new(rect, video, true);

        let p = plain.project(Vec2::new(0.25, 0.5));
        assert_eq!(p, Vec2::new(80.0, 120.0));

        let m = mirrored.project(Vec2::new(0.25, 0.5));
        assert_eq!(m, Vec2::new(240.0, 120.0));
    }

    #[test]
    fn test_project_all_keeps_missing() {
        let video = Vec2::new(100.0, 100.0);
        let rect = DrawRect::contain(Vec2::new(100.0, 100.0), video);
        let projector = Projector::new(rect, video, false);
        let set = LandmarkSet::new(vec![
            Landmark::new(0.5, 0.5, -0.1),
            Landmark::new(f32::NAN, 0.5, 0.0),
        ]);
        let pose = projector.project_all(&set);
        assert_eq!(pose.len(), 2);
        let nose = pose.point(LandmarkIndex::Nose).unwrap();
        assert_eq!(nose.pos, Vec2::new(50.0, 50.0));
        assert_eq!(nose.z, -0.1);
        assert!(pose.get(LandmarkIndex::LeftEyeInner).is_none());
        assert!(pose.get(LandmarkIndex::RightHip).is_none());
    }

    #[test]
    fn test_js_round_half_up() {
        assert_eq!(js_round(2.5), 3.0);
        assert_eq!(js_round(-2.5), -2.0);
        assert_eq!(js_round(-2.6), -3.0);
    }
}
