//! Brightness, contrast, saturation and hue rotation.

use super::luma;
use crate::buffer::{PixelBuffer, ALPHA};

/// Color adjustment parameters.
///
/// All fields are percentages except `hue`, which is in degrees. Values are
/// clamped into their documented ranges on construction, so an out-of-range
/// request degrades to the nearest legal value instead of failing.
///
/// The stages run in a fixed order per pixel:
///
/// ```text
/// brightness ─▶ contrast ─▶ saturation ─▶ hue rotation ─▶ clamp/round
/// ```
///
/// # Example
///
/// ```
/// use raster_fx::{ColorAdjustment, PixelBuffer};
///
/// let mut buffer = PixelBuffer::filled(4, 4, [255, 0, 0, 255]);
/// ColorAdjustment::new(0.0, 0.0, 100.0, 100.0).apply(&mut buffer);
///
/// assert_eq!(buffer.pixel(0, 0), [76, 76, 76, 255]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAdjustment {
    hue: f32,
    saturation: f32,
    contrast: f32,
    brightness: f32,
}

impl Default for ColorAdjustment {
    fn default() -> Self {
        Self {
            hue: 0.0,
            saturation: 100.0,
            contrast: 100.0,
            brightness: 100.0,
        }
    }
}

impl ColorAdjustment {
    /// Upper bound for the percentage parameters.
    pub const MAX_PERCENT: f32 = 200.0;

    /// Build an adjustment, clamping every parameter.
    ///
    /// * `hue` - degrees, clamped to 0..=360
    /// * `saturation`, `contrast`, `brightness` - percent, clamped to 0..=200
    pub fn new(hue: f32, saturation: f32, contrast: f32, brightness: f32) -> Self {
        Self {
            hue: clamp_finite(hue, 0.0, 360.0, 0.0),
            saturation: clamp_finite(saturation, 0.0, Self::MAX_PERCENT, 100.0),
            contrast: clamp_finite(contrast, 0.0, Self::MAX_PERCENT, 100.0),
            brightness: clamp_finite(brightness, 0.0, Self::MAX_PERCENT, 100.0),
        }
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn saturation(&self) -> f32 {
        self.saturation
    }

    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// True when applying this adjustment cannot change any pixel.
    pub fn is_identity(&self) -> bool {
        self.saturation == 100.0
            && self.contrast == 100.0
            && self.brightness == 100.0
            && self.hue_matrix().is_none()
    }

    /// Adjust every pixel with alpha > 0 in place. Alpha is never touched.
    pub fn apply(&self, buffer: &mut PixelBuffer) {
        let brightness = self.brightness / 100.0;
        let contrast = (self.contrast / 100.0).powi(2);
        let saturation = self.saturation / 100.0;
        let hue = self.hue_matrix();

        for px in buffer.pixels_mut() {
            if px[ALPHA] == 0 {
                continue;
            }

            let mut rgb = [px[0] as f32, px[1] as f32, px[2] as f32];

            for c in rgb.iter_mut() {
                *c *= brightness;
                *c = ((*c / 255.0 - 0.5) * contrast + 0.5) * 255.0;
            }

            let gray = luma::grayscale(rgb[0], rgb[1], rgb[2]);
            for c in rgb.iter_mut() {
                *c = gray + (*c - gray) * saturation;
            }

            if let Some(m) = &hue {
                rgb = rotate(m, rgb);
            }

            for (dst, c) in px.iter_mut().zip(rgb) {
                *dst = c.clamp(0.0, 255.0).round() as u8;
            }
        }
    }

    /// W3C `hue-rotate` matrix, or `None` when the rotation is a full turn.
    fn hue_matrix(&self) -> Option<[[f32; 3]; 3]> {
        let degrees = self.hue % 360.0;
        if degrees == 0.0 {
            return None;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        Some([
            [
                0.213 + cos * 0.787 - sin * 0.213,
                0.715 - cos * 0.715 - sin * 0.715,
                0.072 - cos * 0.072 + sin * 0.928,
            ],
            [
                0.213 - cos * 0.213 + sin * 0.143,
                0.715 + cos * 0.285 + sin * 0.140,
                0.072 - cos * 0.072 - sin * 0.283,
            ],
            [
                0.213 - cos * 0.213 - sin * 0.787,
                0.715 - cos * 0.715 + sin * 0.715,
                0.072 + cos * 0.928 + sin * 0.072,
            ],
        ])
    }
}

#[inline]
fn rotate(m: &[[f32; 3]; 3], rgb: [f32; 3]) -> [f32; 3] {
    let mut out = [0.0; 3];
    for (row, o) in m.iter().zip(out.iter_mut()) {
        *o = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2];
    }
    out
}

/// Clamp, mapping NaN to `fallback`.
fn clamp_finite(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}
