//! App state and orchestration.

pub mod actions;
pub mod init;
pub mod overlay;
pub mod panel;
pub mod pump;

use anyhow::Result;
use crossbeam_channel::Receiver;
use std::time::Instant;
use swingalyze_core::{EstimatorSlot, Session};
use swingalyze_media::VideoPlayer;

use crate::config::AppConfig;
use actions::Action;
use overlay::OverlayCanvas;
use panel::Panel;

/// The analysis client.
pub struct App {
    pub config: AppConfig,
    /// Per-video analysis state
    pub session: Session,
    /// Pose estimator, once initialization finished
    pub estimator: EstimatorSlot,
    /// Delivers the initialization result exactly once
    estimator_rx: Option<Receiver<EstimatorSlot>>,
    /// Currently loaded video
    pub player: Option<VideoPlayer>,
    pub overlay: OverlayCanvas,
    pub panel: Panel,
    /// Control actions from the input thread
    action_rx: Receiver<Action>,
    /// Loop clock origin for estimator timestamps
    start_time: Instant,
    last_update: Option<Instant>,
    /// Analyzed frames written as overlay images
    overlay_frames: u64,
    pub exit_requested: bool,
    /// Exit once nothing is playing
    pub quit_when_idle: bool,
}

impl App {
    pub fn new(
        config: AppConfig,
        action_rx: Receiver<Action>,
        estimator_rx: Receiver<EstimatorSlot>,
    ) -> Result<Self> {
        let session = Session::new(config.display.stage(), config.display.options());
        let overlay = OverlayCanvas::new(session.draw_rect().canvas_size());
        let panel = Panel::new(&config.output.directory)?;

        Ok(Self {
            config,
            session,
            estimator: EstimatorSlot::Loading,
            estimator_rx: Some(estimator_rx),
            player: None,
            overlay,
            panel,
            action_rx,
            start_time: Instant::now(),
            last_update: None,
            overlay_frames: 0,
            exit_requested: false,
            quit_when_idle: false,
        })
    }

    /// Whether the main loop should exit
    pub fn should_exit(&self) -> bool {
        if self.exit_requested {
            return true;
        }
        self.quit_when_idle && self.player.as_ref().map_or(true, |p| p.is_paused())
    }

    pub fn play_label(&self) -> &'static str {
        self.player.as_ref().map_or("Play", |p| p.play_label())
    }
}
