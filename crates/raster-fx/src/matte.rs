//! Corner-keyed background removal.
//!
//! The color of the top-left pixel is taken as the background. Every pixel
//! whose RGB distance to it falls below the tolerance becomes fully
//! transparent. There is no flood fill: enclosed regions that happen to
//! match the corner are cleared too.

use crate::buffer::{PixelBuffer, ALPHA};

/// Default Euclidean RGB distance below which a pixel counts as background.
pub const DEFAULT_TOLERANCE: f32 = 30.0;

/// Clear alpha on every pixel close to the color at `(0, 0)`.
///
/// Returns the number of pixels made transparent.
pub fn remove_background(buffer: &mut PixelBuffer, tolerance: f32) -> usize {
    let [br, bg, bb, _] = buffer.pixel(0, 0);
    let (br, bg, bb) = (br as f32, bg as f32, bb as f32);
    let mut cleared = 0;

    for px in buffer.pixels_mut() {
        let dr = px[0] as f32 - br;
        let dg = px[1] as f32 - bg;
        let db = px[2] as f32 - bb;
        if (dr * dr + dg * dg + db * db).sqrt() < tolerance {
            px[ALPHA] = 0;
            cleared += 1;
        }
    }

    cleared
}
