//! Ordered-level quantization with error diffusion.
//!
//! Each RGB channel is snapped to the nearest of `levels` evenly spaced
//! values in 0..=255 and the rounding error is pushed forward onto the
//! neighbours named by a [`Kernel`]. Pixels are visited in raster order
//! and the error lands directly in the neighbouring 8-bit cells, so the
//! result is fully deterministic for a given input.
//!
//! # Example
//!
//! ```
//! use raster_fx::{ErrorDiffusion, PixelBuffer};
//!
//! let mut buffer = PixelBuffer::filled(8, 8, [100, 160, 30, 255]);
//! ErrorDiffusion::for_intensity(10.0).apply(&mut buffer);
//!
//! assert!(buffer.as_bytes().chunks(4).all(|p| p[..3].iter().all(|&c| c == 0 || c == 255)));
//! ```

mod kernel;

pub use kernel::{Kernel, FLOYD_STEINBERG};

use crate::buffer::{PixelBuffer, ALPHA, CHANNELS};

/// Number of quantization levels for an effect intensity in percent.
///
/// `max(2, floor(intensity / 100 * 8))`, so 1..=37 gives a two-tone
/// result and 100 gives eight levels.
pub fn levels_for_intensity(intensity: f32) -> u8 {
    let levels = (intensity.clamp(0.0, 100.0) / 100.0 * 8.0).floor() as u8;
    levels.max(2)
}

/// Error diffusion quantizer.
#[derive(Debug, Clone, Copy)]
pub struct ErrorDiffusion {
    levels: u8,
    kernel: Kernel,
}

impl ErrorDiffusion {
    /// Quantizer with `levels` output values per channel (at least 2),
    /// diffusing with Floyd-Steinberg.
    pub fn new(levels: u8) -> Self {
        Self {
            levels: levels.max(2),
            kernel: FLOYD_STEINBERG,
        }
    }

    /// Quantizer whose level count follows [`levels_for_intensity`].
    pub fn for_intensity(intensity: f32) -> Self {
        Self::new(levels_for_intensity(intensity))
    }

    /// Replace the diffusion kernel.
    pub fn kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn levels(&self) -> u8 {
        self.levels
    }

    /// Distance between adjacent output levels.
    pub fn step(&self) -> f32 {
        255.0 / (self.levels - 1) as f32
    }

    /// Quantize in place. Transparent pixels are skipped and never receive
    /// error; alpha is never modified.
    pub fn apply(&self, buffer: &mut PixelBuffer) {
        let width = buffer.width() as i64;
        let height = buffer.height() as i64;
        let step = self.step();
        let divisor = self.kernel.divisor as f32;
        let data = buffer.as_bytes_mut();

        for y in 0..height {
            for x in 0..width {
                let i = ((y * width + x) as usize) * CHANNELS;
                if data[i + ALPHA] == 0 {
                    continue;
                }

                let mut error = [0.0f32; 3];
                for c in 0..3 {
                    let old = data[i + c] as f32;
                    let quantized = (old / step).round() * step;
                    data[i + c] = store(quantized);
                    error[c] = old - quantized;
                }

                if error == [0.0; 3] {
                    continue;
                }

                for &(dx, dy, weight) in self.kernel.entries {
                    let nx = x + dx as i64;
                    let ny = y + dy as i64;
                    if nx < 0 || nx >= width || ny >= height {
                        continue;
                    }
                    let ni = ((ny * width + nx) as usize) * CHANNELS;
                    if data[ni + ALPHA] == 0 {
                        continue;
                    }
                    let share = weight as f32 / divisor;
                    for c in 0..3 {
                        data[ni + c] = store(data[ni + c] as f32 + error[c] * share);
                    }
                }
            }
        }
    }
}

/// Write semantics of a clamped byte array: clamp, then round half to even.
#[inline]
fn store(value: f32) -> u8 {
    value.clamp(0.0, 255.0).round_ties_even() as u8
}
