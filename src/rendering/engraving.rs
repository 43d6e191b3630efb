//! Engraving: wavy horizontal strokes whose weight follows darkness.

use rand::RngCore;
use raster_fx::PixelBuffer;

use super::canvas::Canvas;
use super::stylize::{StyleParams, Stylize};
use crate::error::ProcessingError;

const MIN_ALPHA: u8 = 20;

/// Strokes thinner than this are not drawn
const MIN_THICKNESS: f32 = 0.2;

/// A planned stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub width: f32,
    pub color: [u8; 4],
}

/// Row spacing in pixels.
pub fn line_gap(params: &StyleParams) -> f32 {
    (params.effect.scale * params.upscale).max(3.0)
}

/// Compute every stroke without painting.
pub fn plan(buffer: &PixelBuffer, params: &StyleParams) -> Vec<Segment> {
    let (w, h) = (buffer.width(), buffer.height());
    let up = params.upscale;
    let gap = line_gap(params);
    let step = 2.0 * up;
    let freq = 0.2 / up;
    let amp = gap * 0.25;
    let weight = params.effect.intensity / 50.0;
    let wave = |x: f32| (x * freq).sin() * amp;

    let mut segments = Vec::new();
    let mut y = 0.0f32;
    while y < h as f32 {
        let iy = (y.floor() as u32).min(h - 1);
        let mut x = 0.0f32;
        while x < w as f32 {
            let ix = (x.floor() as u32).min(w - 1);
            let color = buffer.pixel(ix, iy);
            if color[3] >= MIN_ALPHA {
                let lum = raster_fx::color::luma::luma([color[0], color[1], color[2]]);
                let thickness = gap * weight * (1.0 - lum) * 1.2;
                if thickness >= MIN_THICKNESS {
                    segments.push(Segment {
                        from: (x, y + wave(x)),
                        to: (x + step, y + wave(x + step)),
                        width: thickness,
                        color,
                    });
                }
            }
            x += step;
        }
        y += gap;
    }
    segments
}

pub struct Engraving;

impl Stylize for Engraving {
    fn stylize(
        &self,
        buffer: PixelBuffer,
        params: &StyleParams,
        _rng: &mut dyn RngCore,
    ) -> Result<PixelBuffer, ProcessingError> {
        let segments = plan(&buffer, params);
        let mut canvas = Canvas::new(buffer.width(), buffer.height())?;
        for s in &segments {
            canvas.stroke_segment(s.from, s.to, s.width, s.color);
        }
        tracing::debug!(segments = segments.len(), gap = line_gap(params), "Engraving painted");
        canvas.into_buffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EffectSettings;

    fn params(intensity: f32, scale: f32, upscale: f32) -> StyleParams {
        StyleParams::new(
            EffectSettings {
                intensity,
                scale,
                angle: 0.0,
            },
            upscale,
        )
    }

    #[test]
    fn test_black_rows_and_thickness() {
        let buffer = PixelBuffer::filled(20, 12, [0, 0, 0, 255]);
        let segments = plan(&buffer, &params(50.0, 6.0, 1.0));

        // rows at y=0 and y=6, segments every 2 px
        assert_eq!(segments.len(), 2 * 10);
        // gap 6 * (50/50) * 1.0 * 1.2
        assert!(segments.iter().all(|s| (s.width - 7.2).abs() < 1e-5));
        assert_eq!(segments[0].from, (0.0, 0.0));
        assert_eq!(segments[10].from.0, 0.0);
        assert_eq!(segments[10].from.1, 6.0);
    }

    #[test]
    fn test_wave_offset() {
        let buffer = PixelBuffer::filled(10, 4, [0, 0, 0, 255]);
        let segments = plan(&buffer, &params(50.0, 4.0, 1.0));
        let s = segments[1];
        let expected_from = (2.0f32 * 0.2).sin() * 4.0 * 0.25;
        let expected_to = (4.0f32 * 0.2).sin() * 4.0 * 0.25;
        assert!((s.from.1 - expected_from).abs() < 1e-5);
        assert!((s.to.1 - expected_to).abs() < 1e-5);
        assert_eq!(s.to.0, 4.0);
    }

    #[test]
    fn test_white_skipped_by_thickness() {
        let buffer = PixelBuffer::filled(10, 10, [255, 255, 255, 255]);
        assert!(plan(&buffer, &params(100.0, 10.0, 1.0)).is_empty());
    }

    #[test]
    fn test_transparent_skipped() {
        let buffer = PixelBuffer::filled(10, 10, [0, 0, 0, 19]);
        assert!(plan(&buffer, &params(100.0, 10.0, 1.0)).is_empty());
    }

    #[test]
    fn test_upscale_scales_geometry() {
        let buffer = PixelBuffer::filled(16, 4, [0, 0, 0, 255]);
        let p = params(50.0, 3.0, 2.0);
        assert_eq!(line_gap(&p), 6.0);
        let segments = plan(&buffer, &p);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[1].from.0, 4.0);
    }
}
