//! Source decoding.
//!
//! A source is a `data:` URI, bare base64 text, or raw encoded bytes in any
//! format the `image` crate understands. The result is always RGBA8.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use raster_fx::PixelBuffer;

use crate::error::DecodeError;

/// Decode any supported source into a pixel buffer.
pub fn load(source: &[u8]) -> Result<PixelBuffer, DecodeError> {
    let trimmed = source.trim_ascii();
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }

    if trimmed.starts_with(b"data:") {
        let text = std::str::from_utf8(trimmed).map_err(|_| DecodeError::MalformedDataUri)?;
        return decode_bytes(&decode_data_uri(text)?);
    }

    if image::guess_format(trimmed).is_ok() {
        return decode_bytes(trimmed);
    }

    decode_bytes(&decode_base64(trimmed)?)
}

/// Decode a textual source (data URI or bare base64).
pub fn load_str(source: &str) -> Result<PixelBuffer, DecodeError> {
    load(source.as_bytes())
}

/// Extract the payload of a `data:<mime>;base64,<payload>` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, DecodeError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or(DecodeError::MalformedDataUri)?;
    let (meta, payload) = rest.split_once(',').ok_or(DecodeError::MalformedDataUri)?;
    if !meta.ends_with(";base64") {
        return Err(DecodeError::MalformedDataUri);
    }
    decode_base64(payload.as_bytes())
}

fn decode_base64(text: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let compact: Vec<u8> = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(STANDARD.decode(compact)?)
}

fn decode_bytes(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    let img = image::load_from_memory(bytes)?.into_rgba8();
    let (width, height) = img.dimensions();
    tracing::debug!(width, height, bytes = bytes.len(), "Decoded source image");
    Ok(PixelBuffer::from_raw(width, height, img.into_raw())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::encode::encode_png;

    fn red_png() -> Vec<u8> {
        encode_png(&PixelBuffer::filled(3, 2, [255, 0, 0, 255]), None).unwrap()
    }

    #[test]
    fn test_load_raw_png() {
        let buffer = load(&red_png()).unwrap();
        assert_eq!((buffer.width(), buffer.height()), (3, 2));
        assert_eq!(buffer.pixel(2, 1), [255, 0, 0, 255]);
    }

    #[test]
    fn test_load_data_uri() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(red_png()));
        let buffer = load_str(&uri).unwrap();
        assert_eq!(buffer.pixel(0, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_load_bare_base64_with_whitespace() {
        let mut text = STANDARD.encode(red_png());
        text.insert(10, '\n');
        let buffer = load_str(&format!("  {text}\n")).unwrap();
        assert_eq!(buffer.width(), 3);
    }

    #[test]
    fn test_malformed_data_uri() {
        assert!(matches!(
            load_str("data:image/png,notbase64"),
            Err(DecodeError::MalformedDataUri)
        ));
        assert!(matches!(
            load_str("data:image/png;base64"),
            Err(DecodeError::MalformedDataUri)
        ));
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(load_str("!!!not base64!!!"), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_empty_source() {
        assert!(matches!(load(b"   "), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_corrupt_png() {
        let mut png = red_png();
        png.truncate(20);
        assert!(matches!(load(&png), Err(DecodeError::Image(_))));
    }

    #[test]
    fn test_valid_base64_of_garbage() {
        let text = STANDARD.encode(b"definitely not an image");
        assert!(matches!(load_str(&text), Err(DecodeError::Image(_))));
    }
}
