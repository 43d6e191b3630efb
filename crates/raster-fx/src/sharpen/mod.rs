//! Detail recovery after upscaling.
//!
//! Resampling softens edges; an unsharp mask restores them by amplifying
//! the difference between the image and a blurred copy of itself.
//!
//! - [`gaussian_blur`]: separable, edge-clamped Gaussian blur
//! - [`UnsharpMask`]: thresholded detail amplification

mod blur;
mod unsharp;

pub use blur::{gaussian_blur, gaussian_kernel};
pub use unsharp::UnsharpMask;
