//! PNG and JPEG encoding.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use raster_fx::PixelBuffer;
use std::io::Cursor;

use crate::error::ProcessingError;

/// Metres per inch, for the PNG `pHYs` chunk
const METERS_PER_INCH: f64 = 0.0254;

/// `pHYs` pixels-per-metre for a DPI value
pub fn pixels_per_meter(dpi: u32) -> u32 {
    (dpi as f64 / METERS_PER_INCH).round() as u32
}

/// Encode an RGBA8 buffer as a lossless PNG.
///
/// When `dpi` is set the file carries a `pHYs` chunk so print software
/// picks up the physical size.
pub fn encode_png(buffer: &PixelBuffer, dpi: Option<u32>) -> Result<Vec<u8>, ProcessingError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, buffer.width(), buffer.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        if let Some(dpi) = dpi {
            let ppm = pixels_per_meter(dpi);
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| ProcessingError::Encode(format!("PNG: {e}")))?;
        writer
            .write_image_data(buffer.as_bytes())
            .map_err(|e| ProcessingError::Encode(format!("PNG: {e}")))?;
    }
    Ok(buf.into_inner())
}

/// Encode as JPEG, dropping alpha.
pub fn encode_jpeg(buffer: &PixelBuffer, quality: u8) -> Result<Vec<u8>, ProcessingError> {
    let rgba = image::RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.as_bytes().to_vec())
        .ok_or(ProcessingError::CanvasAllocation {
            width: buffer.width(),
            height: buffer.height(),
        })?;
    let rgb = image::DynamicImage::ImageRgba8(rgba).into_rgb8();

    let mut out = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| ProcessingError::Encode(format!("JPEG: {e}")))?;
    Ok(out)
}

/// Wrap encoded bytes in a `data:` URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixels_per_meter() {
        assert_eq!(pixels_per_meter(300), 11811);
        assert_eq!(pixels_per_meter(72), 2835);
    }

    #[test]
    fn test_png_round_trip_keeps_alpha() {
        let mut buffer = PixelBuffer::filled(4, 3, [10, 20, 30, 255]);
        buffer.set_pixel(1, 1, [1, 2, 3, 0]);
        let png = encode_png(&buffer, None).unwrap();

        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
        assert_eq!(decoded.as_raw().as_slice(), buffer.as_bytes());
    }

    #[test]
    fn test_png_carries_phys_chunk() {
        let buffer = PixelBuffer::filled(2, 2, [0, 0, 0, 255]);
        let png = encode_png(&buffer, Some(300)).unwrap();

        let decoder = png::Decoder::new(Cursor::new(png));
        let reader = decoder.read_info().unwrap();
        let dims = reader.info().pixel_dims.unwrap();
        assert_eq!(dims.xppu, 11811);
        assert_eq!(dims.yppu, 11811);
        assert_eq!(dims.unit, png::Unit::Meter);
    }

    #[test]
    fn test_png_without_dpi_has_no_phys() {
        let buffer = PixelBuffer::filled(2, 2, [0, 0, 0, 255]);
        let png = encode_png(&buffer, None).unwrap();
        let reader = png::Decoder::new(Cursor::new(png)).read_info().unwrap();
        assert!(reader.info().pixel_dims.is_none());
    }

    #[test]
    fn test_jpeg_encoding() {
        let buffer = PixelBuffer::filled(8, 8, [200, 100, 50, 255]);
        let jpeg = encode_jpeg(&buffer, 70).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(data_uri("image/png", b"abc"), "data:image/png;base64,YWJj");
    }
}
