//! Decoded video frame handed from the media layer to the estimator

use glam::Vec2;
use std::time::Duration;

/// A decoded RGBA8 frame
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    /// Tightly packed RGBA8 pixels, `width * height * 4` bytes
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Presentation timestamp from the start of the source
    pub pts: Duration,
}

impl VideoFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, pts: Duration) -> Self {
        Self {
            data,
            width,
            height,
            pts,
        }
    }

    /// Native size as a vector, for viewport math
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Presentation time in milliseconds
    pub fn pts_ms(&self) -> f64 {
        self.pts.as_secs_f64() * 1000.0
    }
}
