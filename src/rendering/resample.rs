//! High-quality resampling.

use image::imageops::{self, FilterType};
use raster_fx::PixelBuffer;

use crate::error::ProcessingError;

/// Lanczos3 resize to exactly `width` x `height`.
///
/// Returns the input unchanged when the size already matches.
pub fn resize(
    buffer: PixelBuffer,
    width: u32,
    height: u32,
) -> Result<PixelBuffer, ProcessingError> {
    if buffer.width() == width && buffer.height() == height {
        return Ok(buffer);
    }

    let (src_w, src_h, data) = buffer.into_raw();
    let src = image::RgbaImage::from_raw(src_w, src_h, data).ok_or(
        ProcessingError::CanvasAllocation {
            width: src_w,
            height: src_h,
        },
    )?;

    let resized = imageops::resize(&src, width, height, FilterType::Lanczos3);
    tracing::debug!(src_w, src_h, width, height, "Resampled");

    PixelBuffer::from_raw(width, height, resized.into_raw())
        .map_err(|_| ProcessingError::CanvasAllocation { width, height })
}

/// Scale so the longer side equals `max_side`, preserving aspect.
pub fn fit_longest_side(
    buffer: PixelBuffer,
    max_side: u32,
) -> Result<PixelBuffer, ProcessingError> {
    let (w, h) = (buffer.width(), buffer.height());
    let scale = max_side as f64 / w.max(h) as f64;
    let width = ((w as f64 * scale).round() as u32).max(1);
    let height = ((h as f64 * scale).round() as u32).max(1);
    resize(buffer, width, height)
}
