//! Halftone screen: one dot per grid cell, sized by darkness.

use rand::RngCore;
use raster_fx::PixelBuffer;

use super::canvas::Canvas;
use super::stylize::{StyleParams, Stylize};
use crate::error::ProcessingError;

/// Cells sampled from pixels less opaque than this are left empty
const MIN_ALPHA: u8 = 50;

/// Smallest dot radius actually painted
const MIN_RADIUS: f32 = 0.5;

/// A planned halftone dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub color: [u8; 4],
}

/// Grid pitch in pixels for the given parameters.
pub fn grid_size(params: &StyleParams) -> f32 {
    (params.effect.scale * params.upscale).max(2.0)
}

/// Compute every dot of the screen without painting.
///
/// Cells step by the grid pitch from the top-left corner; each samples the
/// pixel under its center (clamped to the image) and is skipped when that
/// pixel is nearly transparent.
pub fn plan(buffer: &PixelBuffer, params: &StyleParams) -> Vec<Dot> {
    let grid = grid_size(params);
    let half = grid / 2.0;
    let (w, h) = (buffer.width(), buffer.height());
    let max_radius = grid / 1.5;
    let strength = params.effect.intensity / 100.0;

    let mut dots = Vec::new();
    let mut y = 0.0f32;
    while y < h as f32 {
        let iy = ((y + half).floor() as u32).min(h - 1);
        let mut x = 0.0f32;
        while x < w as f32 {
            let ix = ((x + half).floor() as u32).min(w - 1);
            let color = buffer.pixel(ix, iy);
            if color[3] >= MIN_ALPHA {
                let brightness = raster_fx::color::luma::mean_brightness([color[0], color[1], color[2]]);
                let radius = strength * max_radius * (0.4 + (1.0 - brightness) * 0.6 + 0.2);
                dots.push(Dot {
                    cx: x + half,
                    cy: y + half,
                    radius: radius.max(MIN_RADIUS),
                    color,
                });
            }
            x += grid;
        }
        y += grid;
    }
    dots
}

pub struct Halftone;

impl Stylize for Halftone {
    fn stylize(
        &self,
        buffer: PixelBuffer,
        params: &StyleParams,
        _rng: &mut dyn RngCore,
    ) -> Result<PixelBuffer, ProcessingError> {
        let dots = plan(&buffer, params);
        let mut canvas = Canvas::new(buffer.width(), buffer.height())?;
        for dot in &dots {
            canvas.fill_circle(dot.cx, dot.cy, dot.radius, dot.color);
        }
        tracing::debug!(dots = dots.len(), grid = grid_size(params), "Halftone painted");
        canvas.into_buffer()
    }
}
