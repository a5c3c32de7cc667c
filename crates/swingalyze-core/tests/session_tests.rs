use glam::Vec2;
use std::collections::VecDeque;
use std::time::Duration;
use swingalyze_core::landmark::{Landmark, LandmarkIndex as L, LandmarkSet, LANDMARK_COUNT};
use swingalyze_core::{
    DisplayOptions, FrameInput, NoteKind, Phase, PoseEstimator, Session, Status, TickOutcome,
    VideoFrame, PLACEHOLDER,
};

/// Estimator returning a scripted sequence of detections
struct ScriptedEstimator {
    script: VecDeque<Option<LandmarkSet>>,
    calls: usize,
}

impl ScriptedEstimator {
    fn new(script: Vec<Option<LandmarkSet>>) -> Self {
        Self {
            script: script.into(),
            calls: 0,
        }
    }

    fn always(pose: LandmarkSet, n: usize) -> Self {
        Self::new(vec![Some(pose); n])
    }
}

impl PoseEstimator for ScriptedEstimator {
    fn detect(&mut self, _frame: &VideoFrame, _timestamp_ms: f64) -> Option<LandmarkSet> {
        self.calls += 1;
        self.script.pop_front().flatten()
    }
}

/// Upright golfer with the hips shifted right by `hip_shift` (normalized)
fn golfer(hip_shift: f32) -> LandmarkSet {
    let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
    let mut set = |idx: L, x: f32, y: f32| landmarks[idx as usize] = Landmark::new(x, y, 0.0);
    set(L::Nose, 0.5, 0.2);
    set(L::LeftShoulder, 0.45, 0.3);
    set(L::RightShoulder, 0.55, 0.3);
    set(L::LeftHip, 0.46 + hip_shift, 0.55);
    set(L::RightHip, 0.54 + hip_shift, 0.55);
    set(L::LeftKnee, 0.46, 0.7);
    set(L::RightKnee, 0.54, 0.7);
    set(L::LeftAnkle, 0.46, 0.9);
    set(L::RightAnkle, 0.54, 0.9);
    LandmarkSet::new(landmarks)
}

fn frame() -> VideoFrame {
    VideoFrame::new(vec![0; 4 * 4 * 4], 4, 4, Duration::ZERO)
}

fn playing(ts: f64, frame: &VideoFrame) -> FrameInput<'_> {
    FrameInput {
        timestamp_ms: ts,
        frame: Some(frame),
        paused: false,
        ended: false,
    }
}

/// 1000x1000 video on a 1000x1000 stage: normalized * 1000 = pixels
fn started_session() -> Session {
    let mut session = Session::new(Vec2::new(1000.0, 1000.0), DisplayOptions::default());
    session.begin_playback(Vec2::new(1000.0, 1000.0));
    session
}

fn analyzed(outcome: TickOutcome) -> Box<swingalyze_core::FrameAnalysis> {
    match outcome {
        TickOutcome::Analyzed(analysis) => analysis,
        other => panic!("expected analyzed frame, got {:?}", other),
    }
}

#[test]
fn test_tick_before_playback_stops() {
    let mut session = Session::new(Vec2::new(640.0, 480.0), DisplayOptions::default());
    let mut estimator = ScriptedEstimator::always(golfer(0.0), 1);
    let f = frame();
    let outcome = session.tick(Some(&mut estimator), playing(0.0, &f));
    assert_eq!(outcome, TickOutcome::Stopped);
    assert_eq!(estimator.calls, 0);
}

#[test]
fn test_phase_steps_saturate_at_follow() {
    for n in 0..8usize {
        let mut session = started_session();
        let mut estimator = ScriptedEstimator::always(golfer(0.0), n);
        let f = frame();
        for i in 0..n {
            analyzed(session.tick(Some(&mut estimator), playing(i as f64 * 33.0, &f)));
        }
        assert_eq!(session.phase().step_index(), n.min(4), "after {} frames", n);
    }
}

#[test]
fn test_downswing_weight_shift_example() {
    let mut session = started_session();
    let mut estimator = ScriptedEstimator::new(vec![
        Some(golfer(0.0)),
        Some(golfer(0.0)),
        Some(golfer(0.035)),
    ]);
    let f = frame();

    let address = analyzed(session.tick(Some(&mut estimator), playing(0.0, &f)));
    assert_eq!(address.phase, Phase::Address);
    assert_eq!(address.notes.len(), 1);
    assert_eq!(address.measurements.pelvis_drift_px, Some(0.0));

    let backswing = analyzed(session.tick(Some(&mut estimator), playing(33.0, &f)));
    assert_eq!(backswing.phase, Phase::Backswing);

    let downswing = analyzed(session.tick(Some(&mut estimator), playing(66.0, &f)));
    assert_eq!(downswing.phase, Phase::Downswing);
    assert_eq!(downswing.measurements.pelvis_drift_px, Some(35.0));
    assert_eq!(downswing.notes.len(), 2);
    assert_eq!(downswing.notes[0].kind, NoteKind::Good);
    assert_eq!(
        downswing.notes[0].text,
        "Initiate with hips \u{2014} weight shift detected."
    );
    assert_eq!(session.phase(), Phase::Impact);
    assert!(session.notes_html().contains("class=\"note good\""));
}

#[test]
fn test_baseline_captured_once() {
    let mut session = started_session();
    let mut estimator =
        ScriptedEstimator::new(vec![Some(golfer(0.0)), Some(golfer(0.02)), Some(golfer(0.04))]);
    let f = frame();
    for i in 0..3 {
        session.tick(Some(&mut estimator), playing(i as f64 * 33.0, &f));
    }
    let baseline = session.baseline().unwrap();
    assert_eq!(baseline.pelvis_x, 500.0);
    assert_eq!(baseline.captured_at_ms, 0.0);
}

#[test]
fn test_no_pose_leaves_phase_and_notes() {
    let mut session = started_session();
    let mut estimator = ScriptedEstimator::new(vec![Some(golfer(0.0)), None]);
    let f = frame();

    analyzed(session.tick(Some(&mut estimator), playing(0.0, &f)));
    let notes_before = session.notes().to_vec();

    let outcome = session.tick(Some(&mut estimator), playing(33.0, &f));
    assert_eq!(outcome, TickOutcome::NoPose);
    assert_eq!(session.status(), &Status::NoPose);
    assert_eq!(session.phase(), Phase::Backswing);
    assert_eq!(session.notes(), notes_before.as_slice());
}

#[test]
fn test_paused_or_missing_estimator_is_idle() {
    let mut session = started_session();
    let mut estimator = ScriptedEstimator::always(golfer(0.0), 4);
    let f = frame();

    let paused = FrameInput {
        paused: true,
        ..playing(0.0, &f)
    };
    assert_eq!(session.tick(Some(&mut estimator), paused), TickOutcome::Idle);

    let ended = FrameInput {
        ended: true,
        ..playing(10.0, &f)
    };
    assert_eq!(session.tick(Some(&mut estimator), ended), TickOutcome::Idle);

    assert_eq!(session.tick(None, playing(20.0, &f)), TickOutcome::Idle);
    assert_eq!(estimator.calls, 0);
    assert!(session.is_running());
    assert_eq!(session.phase(), Phase::Address);
}

#[test]
fn test_fps_updates_while_paused() {
    let mut session = started_session();
    let f = frame();
    let paused = FrameInput {
        paused: true,
        ..playing(500.0, &f)
    };
    session.tick(None, paused);
    assert_eq!(session.readouts().fps, "2.0");
}

#[test]
fn test_reset_clears_everything() {
    let mut session = started_session();
    let mut estimator = ScriptedEstimator::always(golfer(0.0), 3);
    let f = frame();
    for i in 0..3 {
        session.tick(Some(&mut estimator), playing(300.0 * (i + 1) as f64, &f));
    }
    assert!(session.baseline().is_some());
    assert!(!session.notes().is_empty());

    session.reset();
    assert!(!session.is_running());
    assert!(session.baseline().is_none());
    assert!(session.notes().is_empty());
    assert_eq!(session.notes_html(), "");
    assert_eq!(session.phase(), Phase::Address);
    assert_eq!(session.status(), &Status::Ready);
    assert!(session.readouts().is_cleared());
    assert_eq!(session.readouts().spine_deg, PLACEHOLDER);

    // The loop stops on the next tick
    assert_eq!(
        session.tick(Some(&mut estimator), playing(2000.0, &f)),
        TickOutcome::Stopped
    );
}

#[test]
fn test_overlay_toggle_suppresses_segments() {
    let mut session = started_session();
    let mut estimator = ScriptedEstimator::always(golfer(0.0), 2);
    let f = frame();

    let drawn = analyzed(session.tick(Some(&mut estimator), playing(0.0, &f)));
    assert_eq!(drawn.segments.len(), 13);

    session.toggle_overlay();
    let hidden = analyzed(session.tick(Some(&mut estimator), playing(33.0, &f)));
    assert!(hidden.segments.is_empty());
    // Analysis continues without the overlay
    assert_eq!(hidden.phase, Phase::Backswing);
}

#[test]
fn test_mirror_changes_projection() {
    let mut session = started_session();
    session.toggle_mirror();
    let mut estimator = ScriptedEstimator::always(golfer(0.1), 1);
    let f = frame();
    let analysis = analyzed(session.tick(Some(&mut estimator), playing(0.0, &f)));
    let hip = analysis.pose.get(L::LeftHip).unwrap();
    assert_eq!(hip.x, 440.0);
}
