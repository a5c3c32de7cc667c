//! Swing phase tracker
//!
//! A linear state machine over the five swing phases. It advances exactly one
//! step per successfully measured frame and saturates at [`Phase::Follow`].
//! Transitions are driven by frame count only; no swing kinematics are
//! detected. On each step the phase being left evaluates its threshold checks
//! and emits coaching notes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::measure::Measurements;

/// Head drift tolerated at address, pixels
pub const ADDRESS_HEAD_DRIFT_PX: f32 = 10.0;
/// Pelvis drift tolerated at address, pixels
pub const ADDRESS_PELVIS_DRIFT_PX: f32 = 10.0;
/// Separation angle considered good at the top, degrees
pub const BACKSWING_X_FACTOR_DEG: f32 = 30.0;
/// Minimum knee flex expected in the backswing, degrees
pub const BACKSWING_MIN_KNEE_FLEX_DEG: f32 = 10.0;
/// Pelvis drift that counts as a weight shift, pixels
pub const DOWNSWING_PELVIS_SHIFT_PX: f32 = 20.0;
/// Spine angle considered neutral at impact, degrees
pub const IMPACT_NEUTRAL_SPINE_DEG: f32 = 5.0;

/// Swing phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Address,
    Backswing,
    Downswing,
    Impact,
    Follow,
}

impl Phase {
    /// Fixed phase sequence
    pub const SEQUENCE: [Phase; 5] = [
        Phase::Address,
        Phase::Backswing,
        Phase::Downswing,
        Phase::Impact,
        Phase::Follow,
    ];

    /// Next phase; `Follow` is absorbing
    pub fn next(self) -> Self {
        match self {
            Phase::Address => Phase::Backswing,
            Phase::Backswing => Phase::Downswing,
            Phase::Downswing => Phase::Impact,
            Phase::Impact => Phase::Follow,
            Phase::Follow => Phase::Follow,
        }
    }

    /// Position in [`Phase::SEQUENCE`]
    pub fn step_index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Address => "address",
            Phase::Backswing => "backswing",
            Phase::Downswing => "downswing",
            Phase::Impact => "impact",
            Phase::Follow => "follow",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Note severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    Neutral,
    Good,
    Warning,
    Bad,
}

impl NoteKind {
    /// CSS class used when rendering the note list
    pub fn css_class(self) -> &'static str {
        match self {
            NoteKind::Neutral => "",
            NoteKind::Good => "good",
            NoteKind::Warning => "warn",
            NoteKind::Bad => "bad",
        }
    }
}

/// A severity-tagged coaching message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub kind: NoteKind,
    pub text: String,
}

impl Note {
    pub fn new(kind: NoteKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn neutral(text: impl Into<String>) -> Self {
        Self::new(NoteKind::Neutral, text)
    }

    pub fn good(text: impl Into<String>) -> Self {
        Self::new(NoteKind::Good, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoteKind::Warning, text)
    }

    pub fn bad(text: impl Into<String>) -> Self {
        Self::new(NoteKind::Bad, text)
    }
}

/// Frame-count driven phase state machine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseTracker {
    phase: Phase,
    steps: u64,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of measured frames seen since the last reset
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Evaluate the current phase against `m`, then advance one step.
    /// Returns the notes emitted by the phase that was current on entry.
    pub fn advance(&mut self, m: &Measurements) -> Vec<Note> {
        let notes = evaluate(self.phase, m);
        let from = self.phase;
        self.phase = from.next();
        self.steps += 1;
        if from != self.phase {
            tracing::debug!("Swing phase {} -> {}", from, self.phase);
        }
        notes
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Address;
        self.steps = 0;
    }
}

fn exceeds(value: Option<f32>, limit: f32) -> bool {
    value.is_some_and(|v| v.abs() > limit)
}

/// Coaching notes for one phase and one measurement record
pub fn evaluate(phase: Phase, m: &Measurements) -> Vec<Note> {
    let mut notes = Vec::new();
    match phase {
        Phase::Address => {
            notes.push(Note::neutral(
                "At address: hold steady head & pelvis. Target < 10px drift.",
            ));
            if exceeds(m.head_drift_px, ADDRESS_HEAD_DRIFT_PX) {
                notes.push(Note::bad("Head swaying at address."));
            }
            if exceeds(m.pelvis_drift_px, ADDRESS_PELVIS_DRIFT_PX) {
                notes.push(Note::warning("Pelvis shifting; quiet lower body."));
            }
        }
        Phase::Backswing => {
            if m.x_factor.is_some_and(|x| x > BACKSWING_X_FACTOR_DEG) {
                notes.push(Note::good("Good shoulder\u{2011}hip separation."));
            }
            if m.knee_flex.is_some_and(|k| k < BACKSWING_MIN_KNEE_FLEX_DEG) {
                notes.push(Note::warning("Maintain some knee flex in backswing."));
            }
            notes.push(Note::neutral(
                "Top of backswing: check stable base, growing X\u{2011}factor.",
            ));
        }
        Phase::Downswing => {
            if exceeds(m.pelvis_drift_px, DOWNSWING_PELVIS_SHIFT_PX) {
                notes.push(Note::good("Initiate with hips \u{2014} weight shift detected."));
            }
            notes.push(Note::neutral("Create sequence: hips \u{2192} torso \u{2192} arms."));
        }
        Phase::Impact => {
            if m.spine_angle.is_some_and(|s| s.abs() < IMPACT_NEUTRAL_SPINE_DEG) {
                notes.push(Note::good("Neutral spine at impact."));
            }
            notes.push(Note::neutral("Hands ahead of clubhead (forward shaft lean)."));
        }
        Phase::Follow => {
            notes.push(Note::neutral("Balanced finish; chest to target."));
        }
    }
    notes
}
