//! Error type for buffer construction.
//!
//! The pixel transforms themselves cannot fail; only building a
//! [`PixelBuffer`](crate::PixelBuffer) from untrusted dimensions or bytes can.

use std::fmt;

/// Error returned when a [`PixelBuffer`](crate::PixelBuffer) cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Width or height is zero.
    ZeroDimension { width: u32, height: u32 },
    /// Byte length does not equal `width * height * 4`.
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::ZeroDimension { width, height } => {
                write!(f, "image has zero dimension ({}x{})", width, height)
            }
            BufferError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "pixel data length {} does not match expected {}",
                    actual, expected
                )
            }
        }
    }
}

impl std::error::Error for BufferError {}
