//! Procedural painting surface backed by a tiny-skia pixmap.

use raster_fx::PixelBuffer;
use tiny_skia::{FillRule, LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::error::ProcessingError;

/// A cleared, transparent canvas that stylizers paint onto.
///
/// Painting is anti-aliased source-over compositing, so overlapping marks
/// blend the way a browser 2D context would.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, ProcessingError> {
        let pixmap =
            Pixmap::new(width, height).ok_or(ProcessingError::CanvasAllocation { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fill a circle in a straight (non-premultiplied) RGBA color.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, rgba: [u8; 4]) {
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };
        let paint = paint(rgba);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    /// Stroke a round-capped straight segment.
    pub fn stroke_segment(&mut self, from: (f32, f32), to: (f32, f32), width: f32, rgba: [u8; 4]) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            ..Default::default()
        };
        let paint = paint(rgba);
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Convert to straight-alpha RGBA8.
    pub fn into_buffer(self) -> Result<PixelBuffer, ProcessingError> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        PixelBuffer::from_raw(width, height, data)
            .map_err(|_| ProcessingError::CanvasAllocation { width, height })
    }
}

fn paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    paint.anti_alias = true;
    paint
}
