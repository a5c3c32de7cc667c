//! Frame loop: one `update` per tick, driven by a tokio interval.

use anyhow::Result;
use std::time::{Duration, Instant};
use swingalyze_core::{FrameInput, TickOutcome};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::actions::handle_actions;
use super::init::poll_estimator;
use super::panel::PanelState;
use super::App;

/// File name of the overlay written on exit
pub const FINAL_OVERLAY_FILE: &str = "overlay.png";

/// Run the loop until quit. Ticks that fall behind are skipped, not queued.
pub async fn run(mut app: App) -> Result<()> {
    let period = Duration::from_secs_f64(1.0 / app.config.display.tick_hz);
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Frame loop running at {:.1} Hz", app.config.display.tick_hz);
    publish_panel(&mut app);

    loop {
        interval.tick().await;
        update(&mut app, Instant::now());
        if app.should_exit() {
            break;
        }
    }

    finish(&app);
    Ok(())
}

/// One loop iteration at wall time `now`
pub fn update(app: &mut App, now: Instant) {
    handle_actions(app);
    poll_estimator(app);

    let elapsed = app
        .last_update
        .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
    app.last_update = Some(now);

    if let Some(player) = app.player.as_mut() {
        player.set_rate(app.session.playback_rate());
        if let Err(e) = player.update(elapsed) {
            warn!("Playback error, pausing: {}", e);
            player.pause();
        }
    }

    let timestamp_ms = now.saturating_duration_since(app.start_time).as_secs_f64() * 1000.0;
    analyze(app, timestamp_ms);
    publish_panel(app);
}

/// Run the session step on the current frame and redraw the overlay
fn analyze(app: &mut App, timestamp_ms: f64) {
    let input = match app.player.as_ref() {
        Some(player) => FrameInput {
            timestamp_ms,
            frame: player.current_frame(),
            paused: player.is_paused(),
            ended: player.is_ended(),
        },
        None => FrameInput {
            timestamp_ms,
            frame: None,
            paused: true,
            ended: false,
        },
    };

    match app.session.tick(app.estimator.get_mut(), input) {
        TickOutcome::Stopped | TickOutcome::Idle => {}
        TickOutcome::NoPose => app.overlay.clear(),
        TickOutcome::Analyzed(analysis) => {
            app.overlay.clear();
            app.overlay.draw_segments(&analysis.segments);
            debug!(
                "{} frame: {} notes, {} segments",
                analysis.phase,
                analysis.notes.len(),
                analysis.segments.len()
            );
            if app.config.output.write_overlay_frames {
                let path = app
                    .panel
                    .directory()
                    .join(format!("overlay_{:05}.png", app.overlay_frames));
                if let Err(e) = app.overlay.save_png(&path) {
                    warn!("{:#}", e);
                }
            }
            app.overlay_frames += 1;
        }
    }
}

fn publish_panel(app: &mut App) {
    let state = PanelState::capture(&app.session, app.play_label());
    if let Err(e) = app.panel.publish(state) {
        warn!("Failed to update panel: {:#}", e);
    }
}

fn finish(app: &App) {
    if app.overlay.size().is_some() {
        let path = app.panel.directory().join(FINAL_OVERLAY_FILE);
        match app.overlay.save_png(&path) {
            Ok(()) => info!("Last overlay written to {:?}", path),
            Err(e) => warn!("{:#}", e),
        }
    }
    info!("Analyzed {} frames", app.overlay_frames);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::Action;
    use crate::config::AppConfig;
    use crossbeam_channel::{bounded, unbounded, Sender};
    use swingalyze_core::{
        EstimatorSlot, Landmark, LandmarkReplayEstimator, LandmarkSet, LandmarkTrack, Phase,
        Status, TrackFrame, LANDMARK_COUNT,
    };

    struct Harness {
        app: App,
        actions: Sender<Action>,
        estimator: Sender<EstimatorSlot>,
        now: Instant,
        _out: tempfile::TempDir,
    }

    impl Harness {
        fn new() -> Self {
            let out = tempfile::tempdir().unwrap();
            let mut config = AppConfig::default();
            config.output.directory = out.path().to_path_buf();
            let (actions, action_rx) = unbounded();
            let (estimator, estimator_rx) = bounded(1);
            let app = App::new(config, action_rx, estimator_rx).unwrap();
            Self {
                now: app.start_time,
                app,
                actions,
                estimator,
                _out: out,
            }
        }

        fn step(&mut self, ms: u64) {
            self.now += Duration::from_millis(ms);
            update(&mut self.app, self.now);
        }

        fn send(&self, action: Action) {
            self.actions.send(action).unwrap();
        }
    }

    /// Every demo frame (30 fps for 6 s) holds the same upright pose
    fn demo_track() -> LandmarkTrack {
        let pose: LandmarkSet = (0..LANDMARK_COUNT)
            .map(|i| Landmark::new(0.4 + i as f32 * 0.005, 0.2 + i as f32 * 0.02, 0.0))
            .collect();
        LandmarkTrack {
            frames: vec![TrackFrame {
                timestamp_ms: 0.0,
                landmarks: Some(pose),
            }],
        }
    }

    #[test]
    fn test_estimator_failure_updates_status() {
        let mut h = Harness::new();
        h.step(0);
        assert_eq!(h.app.session.status(), &Status::LoadingModels);

        h.estimator
            .send(EstimatorSlot::Unavailable("no track".into()))
            .unwrap();
        h.step(33);
        assert_eq!(h.app.session.status(), &Status::ModelLoadFailed);
    }

    #[test]
    fn test_demo_without_estimator_keeps_running() {
        let mut h = Harness::new();
        h.send(Action::Load(swingalyze_media::VideoSource::Demo));
        h.step(0);
        assert!(h.app.session.is_running());
        assert_eq!(h.app.overlay.size(), Some((1280, 720)));

        for _ in 0..5 {
            h.step(33);
        }
        assert!(h.app.session.is_running());
        assert_eq!(h.app.session.phase(), Phase::Address);
    }

    #[test]
    fn test_demo_with_estimator_draws_and_advances() {
        let mut h = Harness::new();
        h.estimator
            .send(EstimatorSlot::Ready(Box::new(LandmarkReplayEstimator::new(
                demo_track(),
                0.5,
            ))))
            .unwrap();
        h.send(Action::Load(swingalyze_media::VideoSource::Demo));
        h.step(0);
        assert_eq!(h.app.session.status(), &Status::Analyzing);
        assert!(!h.app.overlay.is_blank());

        for _ in 0..6 {
            h.step(33);
        }
        assert_eq!(h.app.session.phase(), Phase::Follow);
        assert!(!h.app.session.notes().is_empty());

        h.send(Action::ToggleOverlay);
        h.step(33);
        assert!(h.app.overlay.is_blank());

        h.send(Action::Reset);
        h.step(33);
        assert!(!h.app.session.is_running());
        assert!(h.app.session.notes().is_empty());
        assert_eq!(h.app.session.status(), &Status::Ready);
    }

    #[test]
    fn test_pause_and_slow_controls() {
        let mut h = Harness::new();
        h.send(Action::Load(swingalyze_media::VideoSource::Demo));
        h.step(0);
        assert_eq!(h.app.play_label(), "Pause");

        h.send(Action::TogglePlay);
        h.step(33);
        assert_eq!(h.app.play_label(), "Play");

        h.send(Action::ToggleSlow);
        h.send(Action::TogglePlay);
        h.step(33);
        assert_eq!(h.app.player.as_ref().unwrap().rate(), 0.5);
    }

    #[test]
    fn test_quit_when_idle_after_input_closed() {
        let mut h = Harness::new();
        h.send(Action::InputClosed);
        h.step(0);
        assert!(h.app.should_exit());

        let mut h = Harness::new();
        h.send(Action::Quit);
        h.step(0);
        assert!(h.app.should_exit());
    }

    #[test]
    fn test_load_missing_file_keeps_app_alive() {
        let mut h = Harness::new();
        h.send(Action::Load(swingalyze_media::VideoSource::LocalFile(
            "/nonexistent/swing.gif".into(),
        )));
        h.step(0);
        assert!(h.app.player.is_none());
        assert!(!h.app.session.is_running());
        assert!(!h.app.should_exit());
    }
}
