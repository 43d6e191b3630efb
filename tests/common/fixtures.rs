//! Test fixtures and constants.

use inkpress::rendering::{data_uri, encode_png, load};
use raster_fx::PixelBuffer;
use serde_json::{json, Value};

pub const RED: [u8; 4] = [255, 0, 0, 255];
pub const MID_GRAY: [u8; 4] = [128, 128, 128, 255];

/// PNG bytes of a single-color image
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    encode_png(&PixelBuffer::filled(width, height, rgba), None).unwrap()
}

/// Data URI of a single-color PNG
pub fn solid_data_uri(width: u32, height: u32, rgba: [u8; 4]) -> String {
    data_uri("image/png", &solid_png(width, height, rgba))
}

/// PNG with a white border and a colored square in the middle
pub fn framed_png(side: u32, inner: [u8; 4]) -> Vec<u8> {
    let mut buffer = PixelBuffer::filled(side, side, [255, 255, 255, 255]);
    for y in side / 4..side * 3 / 4 {
        for x in side / 4..side * 3 / 4 {
            buffer.set_pixel(x, y, inner);
        }
    }
    encode_png(&buffer, None).unwrap()
}

/// Decode a PNG response body
pub fn decode(png: &[u8]) -> PixelBuffer {
    load(png).unwrap()
}

/// `/api/process` body without background removal
pub fn process_body(image: &str, tool: &str) -> Value {
    json!({
        "image": image,
        "tool": tool,
        "enhance": { "upscale": 1, "removeBg": false },
    })
}
