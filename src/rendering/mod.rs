//! Raster I/O and the procedural and stochastic stylizers.
//!
//! The deterministic per-pixel stages live in the `raster-fx` crate; this
//! module adds decoding, resampling, painting and encoding around them.

pub mod canvas;
pub mod dither;
pub mod encode;
pub mod engraving;
pub mod grain;
pub mod halftone;
pub mod loader;
pub mod resample;
pub mod stippling;
pub mod stylize;

pub use canvas::Canvas;
pub use encode::{data_uri, encode_jpeg, encode_png, pixels_per_meter};
pub use loader::{load, load_str};
pub use stylize::{StyleParams, Stylization, Stylize};
