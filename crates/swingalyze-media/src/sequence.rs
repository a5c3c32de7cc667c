//! Frames from a directory of still images, played in file name order

use crate::{MediaError, Result, VideoDecoder};
use std::path::{Path, PathBuf};
use std::time::Duration;
use swingalyze_core::VideoFrame;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Frames kept from one directory
#[cfg(not(test))]
pub const MAX_SEQUENCE_FRAMES: usize = 5000;
#[cfg(test)]
pub const MAX_SEQUENCE_FRAMES: usize = 10;

/// Decoder for image sequences
///
/// Frames are played back at a fixed rate in file-name order; a single still
/// image is a sequence of one frame.
#[derive(Debug, Clone)]
pub struct ImageSequenceDecoder {
    frames: Vec<PathBuf>,
    width: u32,
    height: u32,
    current_frame: usize,
    fps: f64,
    duration: Duration,
}

impl ImageSequenceDecoder {
    /// Collect the images in `directory`, sorted by file name
    pub fn open<P: AsRef<Path>>(directory: P, fps: f64) -> Result<Self> {
        let directory = directory.as_ref();

        if !directory.is_dir() {
            return Err(MediaError::FileOpen(format!(
                "{} is not a directory",
                directory.display()
            )));
        }

        let mut frames = Vec::new();
        for entry in WalkDir::new(directory)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !Self::is_supported_image(path) {
                continue;
            }
            if frames.len() >= MAX_SEQUENCE_FRAMES {
                warn!(
                    "Sequence {} has more than {} frames; keeping the first {}",
                    directory.display(),
                    MAX_SEQUENCE_FRAMES,
                    MAX_SEQUENCE_FRAMES
                );
                break;
            }
            frames.push(path.to_path_buf());
        }

        if frames.is_empty() {
            return Err(MediaError::DecoderError(format!(
                "{} contains no frames",
                directory.display()
            )));
        }

        Self::from_files(frames, fps)
    }

    /// Build a sequence from explicit frame files, in the given order
    pub fn from_files(frames: Vec<PathBuf>, fps: f64) -> Result<Self> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(MediaError::DecoderError(format!("Invalid frame rate: {}", fps)));
        }
        let first = frames
            .first()
            .ok_or_else(|| MediaError::DecoderError("Empty image sequence".to_string()))?;

        let (width, height) = image::image_dimensions(first).map_err(|e| {
            MediaError::DecoderError(format!("unreadable frame {}: {}", first.display(), e))
        })?;

        let duration = Duration::from_secs_f64(frames.len() as f64 / fps);
        info!(
            "Image sequence loaded: {}x{}, {} frames, {:.2}s @ {:.2} fps",
            width,
            height,
            frames.len(),
            duration.as_secs_f64(),
            fps
        );

        Ok(Self {
            frames,
            width,
            height,
            current_frame: 0,
            fps,
            duration,
        })
    }

    /// Check if a file is a supported still image format
    pub fn is_supported_image(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| {
                matches!(
                    ext.as_str(),
                    "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" | "webp"
                )
            })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn load_frame(&self, index: usize) -> Result<Vec<u8>> {
        let path = &self.frames[index];
        let image = image::open(path).map_err(|e| {
            MediaError::DecoderError(format!("unreadable frame {}: {}", path.display(), e))
        })?;
        let rgba = image.to_rgba8();
        if rgba.dimensions() != (self.width, self.height) {
            return Err(MediaError::DecoderError(format!(
                "Frame {} is {}x{}, sequence is {}x{}",
                self.frames[index].display(),
                rgba.width(),
                rgba.height(),
                self.width,
                self.height
            )));
        }
        Ok(rgba.into_raw())
    }
}

impl VideoDecoder for ImageSequenceDecoder {
    fn next_frame(&mut self) -> Result<VideoFrame> {
        if self.current_frame >= self.frames.len() {
            return Err(MediaError::EndOfStream);
        }

        let data = self.load_frame(self.current_frame)?;
        let pts = Duration::from_secs_f64(self.current_frame as f64 / self.fps);
        self.current_frame += 1;

        Ok(VideoFrame::new(data, self.width, self.height, pts))
    }

    fn seek(&mut self, timestamp: Duration) -> Result<()> {
        if timestamp > self.duration {
            return Err(MediaError::SeekError(
                "seek past end of sequence".to_string(),
            ));
        }
        let index = (timestamp.as_secs_f64() * self.fps) as usize;
        self.current_frame = index.min(self.frames.len() - 1);
        Ok(())
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fps(&self) -> f64 {
        self.fps
    }
}
