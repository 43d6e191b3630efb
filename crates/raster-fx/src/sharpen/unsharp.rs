//! Thresholded unsharp mask.

use super::blur::gaussian_blur;
use crate::buffer::{PixelBuffer, ALPHA};

/// Unsharp mask parameters.
///
/// For each RGB channel of a visible pixel, `detail = original - blurred`.
/// Detail below `threshold` in magnitude is treated as noise and the
/// original value is kept; otherwise the output is
/// `clamp(original + detail * strength)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnsharpMask {
    pub strength: f32,
    pub threshold: f32,
    pub sigma: f32,
}

impl Default for UnsharpMask {
    fn default() -> Self {
        Self {
            strength: 1.0,
            threshold: 5.0,
            sigma: 2.0,
        }
    }
}

impl UnsharpMask {
    pub fn new(strength: f32) -> Self {
        Self {
            strength,
            ..Self::default()
        }
    }

    /// Preset for an upscale factor: 2.0 at 2x, 2.5 at 4x (and above),
    /// `None` when the image was not enlarged.
    pub fn for_upscale(factor: u32) -> Option<Self> {
        match factor {
            0 | 1 => None,
            2 => Some(Self::new(2.0)),
            _ => Some(Self::new(2.5)),
        }
    }

    /// Sharpen in place. Pixels with alpha 0 are not modified; alpha is
    /// never modified.
    pub fn apply(&self, buffer: &mut PixelBuffer) {
        let blurred = gaussian_blur(buffer, self.sigma);

        for (px, soft) in buffer.pixels_mut().zip(blurred.pixels()) {
            if px[ALPHA] == 0 {
                continue;
            }
            for c in 0..3 {
                let original = px[c] as f32;
                let detail = original - soft[c] as f32;
                if detail.abs() < self.threshold {
                    continue;
                }
                px[c] = (original + detail * self.strength).clamp(0.0, 255.0).round() as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_edge() -> PixelBuffer {
        let mut buffer = PixelBuffer::filled(24, 4, [60, 60, 60, 255]);
        for y in 0..4 {
            for x in 12..24 {
                buffer.set_pixel(x, y, [190, 190, 190, 255]);
            }
        }
        buffer
    }

    #[test]
    fn test_presets() {
        assert_eq!(UnsharpMask::for_upscale(1), None);
        assert_eq!(UnsharpMask::for_upscale(2).unwrap().strength, 2.0);
        assert_eq!(UnsharpMask::for_upscale(4).unwrap().strength, 2.5);
    }

    #[test]
    fn test_flat_regions_untouched() {
        let original = PixelBuffer::filled(8, 8, [100, 150, 200, 255]);
        let mut buffer = original.clone();
        UnsharpMask::new(2.5).apply(&mut buffer);
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_edge_contrast_increases() {
        let mut buffer = step_edge();
        UnsharpMask::new(2.0).apply(&mut buffer);
        // dark side darkens, light side brightens next to the edge
        assert!(buffer.pixel(11, 1)[0] < 60);
        assert!(buffer.pixel(12, 1)[0] > 190);
        // far from the edge detail is below threshold
        assert_eq!(buffer.pixel(0, 1)[0], 60);
        assert_eq!(buffer.pixel(23, 1)[0], 190);
    }

    #[test]
    fn test_alpha_preserved_and_transparent_skipped() {
        let mut buffer = step_edge();
        buffer.set_pixel(11, 0, [60, 60, 60, 0]);
        UnsharpMask::new(2.0).apply(&mut buffer);
        assert_eq!(buffer.pixel(11, 0), [60, 60, 60, 0]);
        let opaque = buffer.pixels().filter(|p| p[3] == 255).count();
        assert_eq!(opaque, buffer.pixel_count() - 1);
    }
}
