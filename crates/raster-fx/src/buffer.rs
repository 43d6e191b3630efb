//! RGBA8 pixel storage shared by every stage.
//!
//! [`PixelBuffer`] is the unit of ownership in the pipeline: each stage
//! takes the buffer, transforms it, and hands it on. Storage is a flat
//! row-major `Vec<u8>` with four channels per pixel.

use crate::error::BufferError;

/// Number of channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Channel offset of the alpha value within a pixel.
pub const ALPHA: usize = 3;

/// A width × height RGBA8 image.
///
/// # Invariant
///
/// `data.len() == width * height * 4`, and the pixel at `(x, y)` starts at
/// byte `(y * width + x) * 4`. Constructors enforce this; there is no way to
/// resize the storage afterwards.
///
/// # Example
///
/// ```
/// use raster_fx::PixelBuffer;
///
/// let mut buffer = PixelBuffer::filled(2, 2, [255, 0, 0, 255]);
/// buffer.set_pixel(1, 1, [0, 0, 255, 255]);
///
/// assert_eq!(buffer.pixel(0, 0), [255, 0, 0, 255]);
/// assert_eq!(buffer.pixel(1, 1), [0, 0, 255, 255]);
/// assert_eq!(buffer.index(1, 1), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a fully transparent buffer.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::ZeroDimension`] when either side is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::ZeroDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        })
    }

    /// Wrap existing RGBA8 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::ZeroDimension`] for an empty image and
    /// [`BufferError::LengthMismatch`] when `data` does not hold exactly
    /// `width * height * 4` bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::ZeroDimension { width, height });
        }
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a buffer where every pixel has the same RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero. Intended for fixtures and
    /// synthetic inputs where the size is a known constant.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        assert!(width > 0 && height > 0, "PixelBuffer::filled needs a non-empty size");
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total pixel count.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Byte offset of the pixel at `(x, y)`.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Read the RGBA value at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Overwrite the RGBA value at `(x, y)`.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.index(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// Raw RGBA bytes in row-major order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA bytes. The length cannot change through this slice.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Iterate over pixels as mutable 4-byte chunks.
    pub fn pixels_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        self.data.chunks_exact_mut(CHANNELS)
    }

    /// Iterate over pixels as 4-byte chunks.
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(CHANNELS)
    }

    /// Consume the buffer and return `(width, height, bytes)`.
    pub fn into_raw(self) -> (u32, u32, Vec<u8>) {
        (self.width, self.height, self.data)
    }
}
