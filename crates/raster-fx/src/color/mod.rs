//! Per-pixel color operations.
//!
//! - [`luma`]: luminance weightings used across the crate
//! - [`adjust`]: brightness, contrast, saturation and hue rotation

mod adjust;
pub mod luma;

pub use adjust::ColorAdjustment;
