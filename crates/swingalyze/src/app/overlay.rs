//! Overlay canvas: skeleton strokes rasterized with tiny-skia

use anyhow::{Context, Result};
use glam::Vec2;
use std::path::Path;
use swingalyze_core::skeleton::{SKELETON_ALPHA, SKELETON_COLOR, SKELETON_LINE_WIDTH};
use tiny_skia::{Color, LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Transparent canvas sized to the draw rectangle
#[derive(Default)]
pub struct OverlayCanvas {
    // None while the draw rectangle is empty
    pixmap: Option<Pixmap>,
}

impl OverlayCanvas {
    pub fn new(size: (u32, u32)) -> Self {
        let mut canvas = Self::default();
        canvas.resize(size);
        canvas
    }

    /// Reallocate the backing store; contents are cleared
    pub fn resize(&mut self, (width, height): (u32, u32)) {
        if self.size() == Some((width, height)) {
            self.clear();
            return;
        }
        self.pixmap = Pixmap::new(width, height);
        tracing::debug!("Overlay canvas resized to {}x{}", width, height);
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.pixmap.as_ref().map(|p| (p.width(), p.height()))
    }

    pub fn clear(&mut self) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(Color::TRANSPARENT);
        }
    }

    /// Stroke skeleton segments given in canvas pixels
    pub fn draw_segments(&mut self, segments: &[(Vec2, Vec2)]) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(
            ((SKELETON_COLOR >> 16) & 0xff) as u8,
            ((SKELETON_COLOR >> 8) & 0xff) as u8,
            (SKELETON_COLOR & 0xff) as u8,
            (SKELETON_ALPHA * 255.0).round() as u8,
        );
        paint.anti_alias = true;

        let stroke = Stroke {
            width: SKELETON_LINE_WIDTH,
            line_cap: LineCap::Round,
            ..Stroke::default()
        };

        let mut builder = PathBuilder::new();
        for (a, b) in segments {
            builder.move_to(a.x, a.y);
            builder.line_to(b.x, b.y);
        }
        if let Some(path) = builder.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    /// Alpha of the pixel at (x, y), if inside the canvas
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.as_ref()?.pixel(x, y).map(|p| p.alpha())
    }

    pub fn is_blank(&self) -> bool {
        self.pixmap
            .as_ref()
            .map_or(true, |p| p.pixels().iter().all(|px| px.alpha() == 0))
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        let pixmap = self
            .pixmap
            .as_ref()
            .context("Overlay canvas has no area")?;
        pixmap
            .save_png(path)
            .with_context(|| format!("Failed to write overlay {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_and_clear() {
        let mut canvas = OverlayCanvas::new((64, 32));
        assert!(canvas.is_blank());

        canvas.draw_segments(&[(Vec2::new(4.0, 16.0), Vec2::new(60.0, 16.0))]);
        assert!(canvas.alpha_at(32, 16).unwrap() > 0);
        assert_eq!(canvas.alpha_at(32, 2), Some(0));

        canvas.clear();
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_empty_rect_has_no_canvas() {
        let mut canvas = OverlayCanvas::new((0, 0));
        assert_eq!(canvas.size(), None);
        canvas.draw_segments(&[(Vec2::ZERO, Vec2::ONE)]);
        assert!(canvas.is_blank());
        assert!(canvas.save_png(Path::new("unused.png")).is_err());
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.png");
        let mut canvas = OverlayCanvas::new((8, 8));
        canvas.draw_segments(&[(Vec2::new(0.0, 4.0), Vec2::new(8.0, 4.0))]);
        canvas.save_png(&path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }
}
