//! Control actions: parsed from stdin lines and applied to the app.

use glam::Vec2;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use swingalyze_media::VideoSource;
use tracing::{error, info, warn};

use super::App;

/// A user control
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Load a local file or the demo clip
    Load(VideoSource),
    /// Toggle play/pause
    TogglePlay,
    Reset,
    ToggleOverlay,
    ToggleMirror,
    ToggleSlow,
    /// Stage resized to (width, height)
    Resize(Vec2),
    Quit,
    /// Control input closed; exit once playback stops
    InputClosed,
}

/// Why a control line was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseActionError(String);

impl fmt::Display for ParseActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseActionError {}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let no_args = |action: Action| {
            if rest.is_empty() {
                Ok(action)
            } else {
                Err(ParseActionError(format!("'{}' takes no arguments", command)))
            }
        };

        match command.to_ascii_lowercase().as_str() {
            "load" if rest.is_empty() => Err(ParseActionError("usage: load <path>".into())),
            "load" => Ok(Action::Load(VideoSource::LocalFile(PathBuf::from(rest)))),
            "demo" => no_args(Action::Load(VideoSource::Demo)),
            "play" => no_args(Action::TogglePlay),
            "reset" => no_args(Action::Reset),
            "overlay" => no_args(Action::ToggleOverlay),
            "mirror" => no_args(Action::ToggleMirror),
            "slow" => no_args(Action::ToggleSlow),
            "resize" => parse_size(rest).map(Action::Resize),
            "quit" | "exit" => no_args(Action::Quit),
            "" => Err(ParseActionError("empty command".into())),
            other => Err(ParseActionError(format!("unknown command '{}'", other))),
        }
    }
}

fn parse_size(args: &str) -> Result<Vec2, ParseActionError> {
    let usage = || ParseActionError("usage: resize <width> <height>".into());
    let mut parts = args.split_whitespace();
    let (Some(w), Some(h), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(usage());
    };
    let w: f32 = w.parse().map_err(|_| usage())?;
    let h: f32 = h.parse().map_err(|_| usage())?;
    if !(w.is_finite() && h.is_finite() && w >= 0.0 && h >= 0.0) {
        return Err(usage());
    }
    Ok(Vec2::new(w, h))
}

/// Drain and apply queued actions
pub fn handle_actions(app: &mut App) {
    while let Ok(action) = app.action_rx.try_recv() {
        handle_action(app, action);
    }
}

pub fn handle_action(app: &mut App, action: Action) {
    match action {
        Action::Load(source) => {
            if let Err(e) = load_video(app, &source) {
                error!("Failed to load {:?}: {:#}", source, e);
                app.panel.say(&format!("Could not load video: {}", e));
            }
        }
        Action::TogglePlay => match app.player.as_mut() {
            Some(player) => {
                player.toggle();
                app.panel.say(player.play_label());
            }
            None => warn!("Nothing loaded to play"),
        },
        Action::Reset => {
            app.session.reset();
            app.overlay.clear();
            info!("Session reset");
        }
        Action::ToggleOverlay => {
            let on = app.session.toggle_overlay();
            if !on {
                app.overlay.clear();
            }
            info!("Overlay {}", if on { "on" } else { "off" });
        }
        Action::ToggleMirror => {
            let on = app.session.toggle_mirror();
            info!("Mirror {}", if on { "on" } else { "off" });
        }
        Action::ToggleSlow => {
            let on = app.session.toggle_slow();
            info!("Half speed {}", if on { "on" } else { "off" });
        }
        Action::Resize(stage) => {
            app.session.resize_stage(stage);
            app.overlay.resize(app.session.draw_rect().canvas_size());
        }
        Action::Quit => app.exit_requested = true,
        Action::InputClosed => app.quit_when_idle = true,
    }
}

/// Reset, open the source, size the canvas from its first frame and play
fn load_video(app: &mut App, source: &VideoSource) -> anyhow::Result<()> {
    app.session.reset();
    app.overlay.clear();
    app.player = None;

    let mut player = source.open()?;
    let first = player.load_first_frame()?;
    let size = first.size();

    app.session.begin_playback(size);
    app.overlay.resize(app.session.draw_rect().canvas_size());
    player.set_rate(app.session.playback_rate());
    player.play();
    info!("Loaded {:?} ({}x{})", source, size.x, size.y);

    app.player = Some(player);
    Ok(())
}
