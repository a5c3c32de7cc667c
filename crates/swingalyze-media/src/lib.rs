//! Swingalyze Media - Frame Sources and Playback
//!
//! This crate provides the video element the analysis loop reads from:
//! - Decoder abstraction over animated GIFs, image sequences and the demo pattern
//! - Playback control (play/pause, ended, playback rate)

use std::path::{Path, PathBuf};
use std::time::Duration;
use swingalyze_core::VideoFrame;
use thiserror::Error;

pub mod gif;
pub mod player;
pub mod sequence;
pub mod test_pattern;

pub use gif::{GifDecoder, MAX_GIF_FRAMES};
pub use player::{PlaybackState, VideoPlayer};
pub use sequence::{ImageSequenceDecoder, MAX_SEQUENCE_FRAMES};
pub use test_pattern::TestPatternDecoder;

/// Frame rate assumed for image sequences and single stills
pub const DEFAULT_SEQUENCE_FPS: f64 = 30.0;

/// Media errors
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Failed to open file: {0}")]
    FileOpen(String),

    #[error("Unsupported media format: {0}")]
    UnsupportedFormat(String),

    #[error("Decoder error: {0}")]
    DecoderError(String),

    #[error("End of stream")]
    EndOfStream,

    #[error("Seek error: {0}")]
    SeekError(String),
}

/// Result type for media operations
pub type Result<T> = std::result::Result<T, MediaError>;

/// A source of decoded RGBA frames
pub trait VideoDecoder: Send {
    /// Decode the next frame, or [`MediaError::EndOfStream`]
    fn next_frame(&mut self) -> Result<VideoFrame>;

    fn seek(&mut self, timestamp: Duration) -> Result<()>;

    fn duration(&self) -> Duration;

    /// Native (width, height)
    fn resolution(&self) -> (u32, u32);

    fn fps(&self) -> f64;
}

/// Where a video comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// GIF file, still image, or a directory of numbered frames
    LocalFile(PathBuf),
    /// Built-in synthetic clip
    Demo,
}

impl VideoSource {
    pub fn open(&self) -> Result<VideoPlayer> {
        match self {
            VideoSource::LocalFile(path) => open_path(path),
            VideoSource::Demo => Ok(VideoPlayer::new(TestPatternDecoder::demo())),
        }
    }
}

/// Open a media path and create a video player
///
/// - A directory is treated as an image sequence.
/// - A `.gif` file is decoded with [`GifDecoder`].
/// - A still image becomes a one-frame sequence.
pub fn open_path<P: AsRef<Path>>(path: P) -> Result<VideoPlayer> {
    let path = path.as_ref();

    if path.is_dir() {
        let decoder = ImageSequenceDecoder::open(path, DEFAULT_SEQUENCE_FPS)?;
        return Ok(VideoPlayer::new(decoder));
    }

    if !path.exists() {
        return Err(MediaError::FileOpen(format!(
            "File not found: {}",
            path.display()
        )));
    }

    if GifDecoder::supports_format(path) {
        return Ok(VideoPlayer::new(GifDecoder::open(path)?));
    }

    if ImageSequenceDecoder::is_supported_image(path) {
        let decoder =
            ImageSequenceDecoder::from_files(vec![path.to_path_buf()], DEFAULT_SEQUENCE_FPS)?;
        return Ok(VideoPlayer::new(decoder));
    }

    Err(MediaError::UnsupportedFormat(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file() {
        let err = open_path("/nonexistent/swing.gif").err().unwrap();
        assert!(matches!(err, MediaError::FileOpen(_)));
    }

    #[test]
    fn test_open_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        let err = open_path(file.path()).err().unwrap();
        assert!(matches!(err, MediaError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_demo_source_opens() {
        let player = VideoSource::Demo.open().unwrap();
        assert_eq!(player.resolution(), (1280, 720));
    }
}
