#![allow(clippy::needless_range_loop)]

//! raster-fx: deterministic RGBA transforms for print preparation
//!
//! This crate holds the pixel-level stages of the print pipeline that do
//! not depend on randomness, painting or codecs. Every stage works on a
//! [`PixelBuffer`] and either mutates it in place or returns a new one.
//!
//! # Stages
//!
//! ```text
//!  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!  │ matte        │──▶│ sharpen      │──▶│ color        │──▶│ dither       │
//!  │ corner key   │   │ unsharp mask │   │ adjust       │   │ FS diffusion │
//!  └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! The caller decides which stages run. Decoding, resampling and encoding
//! live with the caller, so this crate has no dependencies.
//!
//! # Example
//!
//! ```
//! use raster_fx::{remove_background, ColorAdjustment, ErrorDiffusion, PixelBuffer};
//!
//! let mut buffer = PixelBuffer::filled(16, 16, [200, 40, 40, 255]);
//! buffer.set_pixel(0, 0, [255, 255, 255, 255]);
//!
//! remove_background(&mut buffer, 30.0);
//! ColorAdjustment::new(0.0, 50.0, 120.0, 100.0).apply(&mut buffer);
//! ErrorDiffusion::for_intensity(50.0).apply(&mut buffer);
//!
//! assert_eq!(buffer.pixel(0, 0)[3], 0);
//! ```
//!
//! # Alpha Handling
//!
//! Alpha is data, not a blend factor. No stage premultiplies. Stages that
//! change color skip pixels with alpha 0 so fully transparent regions
//! keep their original RGB; only the matte writes alpha.

pub mod buffer;
pub mod color;
pub mod dither;
pub mod error;
pub mod matte;
pub mod sharpen;


pub use buffer::PixelBuffer;
pub use color::ColorAdjustment;
pub use dither::{levels_for_intensity, ErrorDiffusion, Kernel, FLOYD_STEINBERG};
pub use error::BufferError;
pub use matte::{remove_background, DEFAULT_TOLERANCE};
pub use sharpen::{gaussian_blur, UnsharpMask};
