//! Luminance weightings.
//!
//! Two near-identical BT.601 weight sets are in use: the saturation stage
//! uses the four-digit grayscale weights, stylization samples use the
//! three-digit ones. They are kept distinct so the grayscale of pure red
//! lands on 76 in both places, but rounding of mixed colors differs by
//! at most one step.

/// Grayscale weights for desaturation (R, G, B).
pub const GRAYSCALE: [f32; 3] = [0.2989, 0.5870, 0.1140];

/// BT.601 luma weights (R, G, B).
pub const BT601: [f32; 3] = [0.299, 0.587, 0.114];

/// Desaturation gray for an RGB triple, unclamped, in 0..=255.
#[inline]
pub fn grayscale(r: f32, g: f32, b: f32) -> f32 {
    GRAYSCALE[0] * r + GRAYSCALE[1] * g + GRAYSCALE[2] * b
}

/// BT.601 luma of an 8-bit pixel normalized to 0.0..=1.0.
#[inline]
pub fn luma(rgb: [u8; 3]) -> f32 {
    (BT601[0] * rgb[0] as f32 + BT601[1] * rgb[1] as f32 + BT601[2] * rgb[2] as f32) / 255.0
}

/// Mean of R, G and B normalized to 0.0..=1.0.
#[inline]
pub fn mean_brightness(rgb: [u8; 3]) -> f32 {
    (rgb[0] as f32 + rgb[1] as f32 + rgb[2] as f32) / 3.0 / 255.0
}
