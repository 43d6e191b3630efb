//! Stippling: randomly placed dots in the source color.

use rand::{Rng, RngCore};
use raster_fx::PixelBuffer;

use super::canvas::Canvas;
use super::halftone::Dot;
use super::stylize::{StyleParams, Stylize};
use crate::error::ProcessingError;

const MIN_ALPHA: u8 = 20;

/// Number of dot attempts for a buffer, before transparency skips.
pub fn attempt_count(width: u32, height: u32, params: &StyleParams) -> usize {
    let density = params.effect.intensity as f64 / 100.0 * 0.8;
    let up = params.upscale as f64;
    let count = width as f64 * height as f64 * density / (up * up);
    count.ceil() as usize
}

pub fn dot_radius(params: &StyleParams) -> f32 {
    (params.effect.scale * params.upscale / 3.0).max(1.0)
}

/// Draw the random dot positions and sample their colors.
pub fn plan(buffer: &PixelBuffer, params: &StyleParams, rng: &mut dyn RngCore) -> Vec<Dot> {
    let (w, h) = (buffer.width(), buffer.height());
    let attempts = attempt_count(w, h, params);
    let radius = dot_radius(params);

    let mut dots = Vec::with_capacity(attempts);
    for _ in 0..attempts {
        let x = rng.gen_range(0..w);
        let y = rng.gen_range(0..h);
        let color = buffer.pixel(x, y);
        if color[3] < MIN_ALPHA {
            continue;
        }
        dots.push(Dot {
            cx: x as f32,
            cy: y as f32,
            radius,
            color,
        });
    }
    dots
}

pub struct Stippling;

impl Stylize for Stippling {
    fn stylize(
        &self,
        buffer: PixelBuffer,
        params: &StyleParams,
        rng: &mut dyn RngCore,
    ) -> Result<PixelBuffer, ProcessingError> {
        let dots = plan(&buffer, params, rng);
        let mut canvas = Canvas::new(buffer.width(), buffer.height())?;
        for dot in &dots {
            canvas.fill_circle(dot.cx, dot.cy, dot.radius, dot.color);
        }
        tracing::debug!(dots = dots.len(), "Stippling painted");
        canvas.into_buffer()
    }
}
