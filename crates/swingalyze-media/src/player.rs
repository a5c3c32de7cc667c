//! Video player: playback clock on top of a [`VideoDecoder`]

use crate::{MediaError, Result, VideoDecoder};
use std::time::Duration;
use swingalyze_core::VideoFrame;
use tracing::{debug, info};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    /// Reached the end of the media; counts as paused
    Ended,
}

/// Drives a decoder from wall-clock deltas.
///
/// The player holds the frame whose presentation time was most recently
/// reached. Rate scales how fast the playback clock advances.
pub struct VideoPlayer {
    decoder: Box<dyn VideoDecoder>,
    state: PlaybackState,
    position: Duration,
    rate: f64,
    current: Option<VideoFrame>,
    pending: Option<VideoFrame>,
    exhausted: bool,
}

impl VideoPlayer {
    pub fn new<D: VideoDecoder + 'static>(decoder: D) -> Self {
        Self::new_with_box(Box::new(decoder))
    }

    pub fn new_with_box(decoder: Box<dyn VideoDecoder>) -> Self {
        Self {
            decoder,
            state: PlaybackState::Paused,
            position: Duration::ZERO,
            rate: 1.0,
            current: None,
            pending: None,
            exhausted: false,
        }
    }

    /// Decode the first frame so the video's dimensions and poster are known
    pub fn load_first_frame(&mut self) -> Result<&VideoFrame> {
        if self.current.is_none() {
            let frame = self.decoder.next_frame()?;
            debug!("First frame decoded at {:?}", frame.pts);
            self.current = Some(frame);
        }
        self.current
            .as_ref()
            .ok_or_else(|| MediaError::DecoderError("No frame decoded".to_string()))
    }

    pub fn play(&mut self) {
        if self.state == PlaybackState::Ended {
            self.rewind();
        }
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Play if paused or ended, pause if playing; returns the new state
    pub fn toggle(&mut self) -> PlaybackState {
        if self.is_paused() {
            self.play();
        } else {
            self.pause();
        }
        self.state
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state != PlaybackState::Playing
    }

    pub fn is_ended(&self) -> bool {
        self.state == PlaybackState::Ended
    }

    /// Label for the play/pause control
    pub fn play_label(&self) -> &'static str {
        if self.is_paused() {
            "Play"
        } else {
            "Pause"
        }
    }

    /// Set the playback rate; non-positive or non-finite rates are ignored
    pub fn set_rate(&mut self, rate: f64) {
        if rate.is_finite() && rate > 0.0 {
            self.rate = rate;
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Duration {
        self.decoder.duration()
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.decoder.resolution()
    }

    pub fn current_frame(&self) -> Option<&VideoFrame> {
        self.current.as_ref()
    }

    /// Advance the playback clock by `elapsed` wall time.
    ///
    /// Returns `true` when a new frame became current.
    pub fn update(&mut self, elapsed: Duration) -> Result<bool> {
        if self.state != PlaybackState::Playing {
            return Ok(false);
        }

        self.position += elapsed.mul_f64(self.rate);
        let mut advanced = false;

        while !self.exhausted {
            let next = match self.pending.take() {
                Some(frame) => frame,
                None => match self.decoder.next_frame() {
                    Ok(frame) => frame,
                    Err(MediaError::EndOfStream) => {
                        self.exhausted = true;
                        break;
                    }
                    Err(e) => return Err(e),
                },
            };

            if next.pts <= self.position {
                self.current = Some(next);
                advanced = true;
            } else {
                self.pending = Some(next);
                break;
            }
        }

        if self.exhausted && self.position >= self.decoder.duration() {
            info!("Playback ended at {:?}", self.position);
            self.state = PlaybackState::Ended;
        }

        Ok(advanced)
    }

    fn rewind(&mut self) {
        match self.decoder.seek(Duration::ZERO) {
            Ok(()) => {
                self.position = Duration::ZERO;
                self.pending = None;
                self.exhausted = false;
            }
            Err(e) => tracing::warn!("Failed to rewind: {}", e),
        }
    }
}
