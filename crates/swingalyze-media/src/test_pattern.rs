//! Synthetic test-pattern source used as the built-in demo clip

use crate::{MediaError, Result, VideoDecoder};
use std::time::Duration;
use swingalyze_core::VideoFrame;

/// Generates frames procedurally: a vertical gradient with a sweeping bar
#[derive(Debug, Clone)]
pub struct TestPatternDecoder {
    width: u32,
    height: u32,
    fps: f64,
    frame_count: u64,
    current_frame: u64,
}

impl TestPatternDecoder {
    pub fn new(width: u32, height: u32, duration: Duration, fps: f64) -> Self {
        let frame_count = (duration.as_secs_f64() * fps).round().max(1.0) as u64;
        Self {
            width,
            height,
            fps,
            frame_count,
            current_frame: 0,
        }
    }

    /// 1280x720, 6 seconds at 30 fps
    pub fn demo() -> Self {
        Self::new(1280, 720, Duration::from_secs(6), 30.0)
    }

    fn render(&self, index: u64) -> Vec<u8> {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut data = vec![0u8; w * h * 4];
        let progress = index as f64 / self.frame_count as f64;
        let bar_x = (progress * w as f64) as usize;
        let bar_w = (w / 40).max(1);

        for (y, row) in data.chunks_exact_mut(w * 4).enumerate() {
            let shade = (40 + y * 80 / h.max(1)) as u8;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let on_bar = x >= bar_x && x < bar_x + bar_w;
                let value = if on_bar { 230 } else { shade };
                px.copy_from_slice(&[value / 2, value, value / 2, 255]);
            }
        }
        data
    }
}

impl VideoDecoder for TestPatternDecoder {
    fn next_frame(&mut self) -> Result<VideoFrame> {
        if self.current_frame >= self.frame_count {
            return Err(MediaError::EndOfStream);
        }
        let index = self.current_frame;
        self.current_frame += 1;
        let pts = Duration::from_secs_f64(index as f64 / self.fps);
        Ok(VideoFrame::new(self.render(index), self.width, self.height, pts))
    }

    fn seek(&mut self, timestamp: Duration) -> Result<()> {
        let index = (timestamp.as_secs_f64() * self.fps) as u64;
        if index > self.frame_count {
            return Err(MediaError::SeekError(
                "Timestamp beyond duration".to_string(),
            ));
        }
        self.current_frame = index;
        Ok(())
    }

    fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frame_count as f64 / self.fps)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fps(&self) -> f64 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_frame_count_and_end() {
        let mut decoder = TestPatternDecoder::new(8, 4, Duration::from_millis(100), 30.0);
        let mut frames = 0;
        while let Ok(frame) = decoder.next_frame() {
            assert_eq!(frame.data.len(), 8 * 4 * 4);
            frames += 1;
        }
        assert_eq!(frames, 3);
        assert!(matches!(decoder.next_frame(), Err(MediaError::EndOfStream)));
    }

    #[test]
    fn test_pattern_is_opaque() {
        let mut decoder = TestPatternDecoder::new(4, 4, Duration::from_secs(1), 10.0);
        let frame = decoder.next_frame().unwrap();
        assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
    }
}
