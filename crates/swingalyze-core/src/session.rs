//! Analysis session: all state mutated by the per-frame step
//!
//! A [`Session`] owns the running flag, the drift baseline, the phase tracker
//! and the draw rectangle. The frame loop calls [`Session::tick`] once per
//! scheduled frame; user controls call the other mutators. Nothing here is
//! shared between threads.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::estimator::{EstimatorSlot, PoseEstimator};
use crate::frame::VideoFrame;
use crate::measure::{measure, Baseline, Measurements};
use crate::notes::{dedupe_notes, notes_to_html};
use crate::phase::{Note, Phase, PhaseTracker};
use crate::readout::{FpsMeter, Readouts};
use crate::skeleton::skeleton_segments;
use crate::viewport::{DrawRect, ProjectedPose, Projector, FALLBACK_VIDEO_SIZE};

/// Playback rate used while the half-speed toggle is on
pub const SLOW_PLAYBACK_RATE: f64 = 0.5;

/// User-visible status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    LoadingModels,
    ModelLoadFailed,
    /// Estimator ready, nothing loaded yet
    AwaitingVideo,
    /// After a reset
    Ready,
    NoPose,
    Analyzing,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Status::LoadingModels => "Loading models\u{2026}",
            Status::ModelLoadFailed => "Failed to load models \u{2014} check network/CORS.",
            Status::AwaitingVideo => "Ready. Load a video.",
            Status::Ready => "Ready.",
            Status::NoPose => "No pose detected",
            Status::Analyzing => "Analyzing\u{2026}",
        };
        f.write_str(text)
    }
}

/// Display toggles from the control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Draw the skeleton overlay
    pub overlay: bool,
    /// Mirror the projection left-right
    pub mirror: bool,
    /// Half-speed playback
    pub slow: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            overlay: true,
            mirror: false,
            slow: false,
        }
    }
}

/// Inputs for one scheduled frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    /// Monotonic loop timestamp, milliseconds
    pub timestamp_ms: f64,
    /// Current decoded frame, if any
    pub frame: Option<&'a VideoFrame>,
    pub paused: bool,
    pub ended: bool,
}

/// Everything derived from one analyzed frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnalysis {
    /// Phase whose checks produced `notes`
    pub phase: Phase,
    pub pose: ProjectedPose,
    /// Skeleton segments to stroke; empty while the overlay is hidden
    pub segments: Vec<(Vec2, Vec2)>,
    pub measurements: Measurements,
    /// De-duplicated, capped notes
    pub notes: Vec<Note>,
}

/// Result of [`Session::tick`]
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Session not running; the loop should stop scheduling
    Stopped,
    /// Paused, ended, no frame yet, or estimator unavailable
    Idle,
    /// Estimation ran but found nobody; the overlay should be cleared
    NoPose,
    Analyzed(Box<FrameAnalysis>),
}

/// Per-video analysis state
#[derive(Debug, Clone)]
pub struct Session {
    running: bool,
    baseline: Option<Baseline>,
    tracker: PhaseTracker,
    stage: Vec2,
    video_size: Option<Vec2>,
    draw_rect: DrawRect,
    options: DisplayOptions,
    fps: FpsMeter,
    readouts: Readouts,
    notes: Vec<Note>,
    status: Status,
}

impl Session {
    pub fn new(stage: Vec2, options: DisplayOptions) -> Self {
        Self {
            running: false,
            baseline: None,
            tracker: PhaseTracker::new(),
            stage,
            video_size: None,
            draw_rect: DrawRect::contain(stage, FALLBACK_VIDEO_SIZE),
            options,
            fps: FpsMeter::new(),
            readouts: Readouts::default(),
            notes: Vec::new(),
            status: Status::LoadingModels,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn baseline(&self) -> Option<&Baseline> {
        self.baseline.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.tracker.phase()
    }

    pub fn draw_rect(&self) -> &DrawRect {
        &self.draw_rect
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    pub fn readouts(&self) -> &Readouts {
        &self.readouts
    }

    /// Notes rendered by the last analyzed frame
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn notes_html(&self) -> String {
        notes_to_html(&self.notes)
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Reflect the outcome of estimator initialization in the status line
    pub fn on_estimator_loaded(&mut self, slot: &EstimatorSlot) {
        self.status = match slot {
            EstimatorSlot::Loading => Status::LoadingModels,
            EstimatorSlot::Ready(_) => Status::AwaitingVideo,
            EstimatorSlot::Unavailable(_) => Status::ModelLoadFailed,
        };
    }

    /// First decoded frame of a newly loaded video: size the canvas and start
    pub fn begin_playback(&mut self, video_size: Vec2) {
        self.video_size = Some(video_size);
        self.recompute_rect();
        self.running = true;
        self.baseline = None;
        self.tracker.reset();
        tracing::info!(
            "Playback started: video {}x{}, canvas {:?}",
            video_size.x,
            video_size.y,
            self.draw_rect.canvas_size()
        );
    }

    /// Stage (display area) changed size
    pub fn resize_stage(&mut self, stage: Vec2) {
        self.stage = stage;
        self.recompute_rect();
    }

    fn recompute_rect(&mut self) {
        let video = self.video_size.unwrap_or(FALLBACK_VIDEO_SIZE);
        self.draw_rect = DrawRect::contain(self.stage, video);
    }

    /// Stop the loop and clear notes, readouts, baseline and phase
    pub fn reset(&mut self) {
        self.running = false;
        self.baseline = None;
        self.tracker.reset();
        self.fps.reset();
        self.notes.clear();
        self.readouts = Readouts::default();
        self.status = Status::Ready;
    }

    pub fn toggle_overlay(&mut self) -> bool {
        self.options.overlay = !self.options.overlay;
        self.options.overlay
    }

    pub fn toggle_mirror(&mut self) -> bool {
        self.options.mirror = !self.options.mirror;
        self.options.mirror
    }

    pub fn toggle_slow(&mut self) -> bool {
        self.options.slow = !self.options.slow;
        self.options.slow
    }

    /// Playback rate the player should run at this frame
    pub fn playback_rate(&self) -> f64 {
        if self.options.slow {
            SLOW_PLAYBACK_RATE
        } else {
            1.0
        }
    }

    fn projector(&self) -> Projector {
        Projector::new(
            self.draw_rect,
            self.video_size.unwrap_or(FALLBACK_VIDEO_SIZE),
            self.options.mirror,
        )
    }

    /// Run one frame step
    pub fn tick(
        &mut self,
        estimator: Option<&mut dyn PoseEstimator>,
        input: FrameInput<'_>,
    ) -> TickOutcome {
        if !self.running {
            return TickOutcome::Stopped;
        }

        if let Some(fps) = self.fps.tick(input.timestamp_ms) {
            self.readouts.set_fps(fps);
        }

        if input.paused || input.ended {
            return TickOutcome::Idle;
        }
        let (Some(frame), Some(estimator)) = (input.frame, estimator) else {
            return TickOutcome::Idle;
        };

        let Some(landmarks) = estimator.detect(frame, input.timestamp_ms) else {
            self.status = Status::NoPose;
            return TickOutcome::NoPose;
        };
        self.status = Status::Analyzing;

        let pose = self.projector().project_all(&landmarks);
        let segments = if self.options.overlay {
            skeleton_segments(&pose)
        } else {
            Vec::new()
        };

        if self.baseline.is_none() {
            self.baseline = Baseline::capture(&pose, input.timestamp_ms);
            if let Some(b) = &self.baseline {
                tracing::debug!("Baseline captured: head_x={} pelvis_x={}", b.head_x, b.pelvis_x);
            }
        }

        let measurements = measure(&pose, self.baseline.as_ref());
        self.readouts.set_measurements(&measurements);

        let phase = self.tracker.phase();
        let notes = dedupe_notes(self.tracker.advance(&measurements));
        self.notes = notes.clone();

        TickOutcome::Analyzed(Box::new(FrameAnalysis {
            phase,
            pose,
            segments,
            measurements,
            notes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new(Vec2::new(1280.0, 720.0), DisplayOptions::default());
        assert!(!session.is_running());
        assert_eq!(session.status(), &Status::LoadingModels);
        assert_eq!(session.draw_rect().w, 1280.0);
    }

    #[test]
    fn test_status_text() {
        assert_eq!(Status::NoPose.to_string(), "No pose detected");
        assert_eq!(Status::Ready.to_string(), "Ready.");
        assert_eq!(Status::AwaitingVideo.to_string(), "Ready. Load a video.");
    }

    #[test]
    fn test_estimator_status_transitions() {
        let mut session = Session::new(Vec2::new(100.0, 100.0), DisplayOptions::default());
        session.on_estimator_loaded(&EstimatorSlot::Unavailable("offline".into()));
        assert_eq!(session.status(), &Status::ModelLoadFailed);
    }

    #[test]
    fn test_toggles_and_rate() {
        let mut session = Session::new(Vec2::new(100.0, 100.0), DisplayOptions::default());
        assert_eq!(session.playback_rate(), 1.0);
        assert!(session.toggle_slow());
        assert_eq!(session.playback_rate(), SLOW_PLAYBACK_RATE);
        assert!(!session.toggle_overlay());
        assert!(session.toggle_mirror());
    }

    #[test]
    fn test_resize_keeps_video_aspect() {
        let mut session = Session::new(Vec2::new(1000.0, 1000.0), DisplayOptions::default());
        session.begin_playback(Vec2::new(400.0, 200.0));
        assert_eq!(session.draw_rect().h, 500.0);
        session.resize_stage(Vec2::new(100.0, 400.0));
        assert_eq!(session.draw_rect().w, 100.0);
        assert_eq!(session.draw_rect().h, 50.0);
        assert_eq!(session.draw_rect().y, 175.0);
    }
}
