//! Animated GIF decoder

use crate::{MediaError, Result, VideoDecoder};
use image::{AnimationDecoder, RgbaImage};
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use swingalyze_core::VideoFrame;
use tracing::info;

/// Maximum number of frames decoded from one GIF
pub const MAX_GIF_FRAMES: usize = 500;

/// Delay substituted for frames that declare none
const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Animated GIF, fully decoded up front
///
/// All frames are decoded up front; playback follows the per-frame delays.
pub struct GifDecoder {
    frames: Vec<(RgbaImage, Duration)>,
    width: u32,
    height: u32,
    current_frame: usize,
    current_time: Duration,
    total_duration: Duration,
    fps: f64,
}

impl GifDecoder {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = std::fs::File::open(path)
            .map_err(|e| MediaError::FileOpen(format!("{}: {}", path.display(), e)))?;
        let decoder = image::codecs::gif::GifDecoder::new(BufReader::new(file))
            .map_err(|e| MediaError::DecoderError(format!("not a readable GIF: {}", e)))?;

        let mut frames = Vec::new();
        let mut total_duration = Duration::ZERO;

        for frame_result in decoder.into_frames() {
            if frames.len() >= MAX_GIF_FRAMES {
                return Err(MediaError::DecoderError(format!(
                    "GIF has too many frames (limit {})",
                    MAX_GIF_FRAMES
                )));
            }
            let frame = frame_result
                .map_err(|e| MediaError::DecoderError(format!("corrupt GIF frame: {}", e)))?;

            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay_ms = if denom == 0 {
                0.0
            } else {
                numer as f64 / denom as f64
            };
            let delay = if delay_ms > 0.0 {
                Duration::from_secs_f64(delay_ms / 1000.0)
            } else {
                DEFAULT_FRAME_DELAY
            };

            frames.push((frame.into_buffer(), delay));
            total_duration += delay;
        }

        let (width, height) = frames
            .first()
            .map(|(image, _)| image.dimensions())
            .ok_or_else(|| MediaError::DecoderError("GIF has no frames".to_string()))?;
        let fps = frames.len() as f64 / total_duration.as_secs_f64();

        info!(
            "Opened GIF {5}: {0}x{1}, {2} frames over {3:.2}s ({4:.2} fps)",
            width,
            height,
            frames.len(),
            total_duration.as_secs_f64(),
            fps,
            path.display()
        );

        Ok(Self {
            frames,
            width,
            height,
            current_frame: 0,
            current_time: Duration::ZERO,
            total_duration,
            fps,
        })
    }

    pub fn supports_format<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("gif"))
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl VideoDecoder for GifDecoder {
    fn next_frame(&mut self) -> Result<VideoFrame> {
        let Some((image, delay)) = self.frames.get(self.current_frame) else {
            return Err(MediaError::EndOfStream);
        };

        let pts = self.current_time;
        let frame = VideoFrame::new(image.as_raw().clone(), self.width, self.height, pts);

        self.current_time += *delay;
        self.current_frame += 1;
        Ok(frame)
    }

    fn seek(&mut self, timestamp: Duration) -> Result<()> {
        if timestamp > self.total_duration {
            return Err(MediaError::SeekError(
                "seek past end of GIF".to_string(),
            ));
        }

        let mut accumulated = Duration::ZERO;
        for (idx, (_, delay)) in self.frames.iter().enumerate() {
            if accumulated + *delay > timestamp {
                self.current_frame = idx;
                self.current_time = accumulated;
                return Ok(());
            }
            accumulated += *delay;
        }

        self.current_frame = self.frames.len();
        self.current_time = self.total_duration;
        Ok(())
    }

    fn duration(&self) -> Duration {
        self.total_duration
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fps(&self) -> f64 {
        self.fps
    }
}
