//! Inkpress - print preparation for DTF apparel transfers
//!
//! Raster effects, print-ready export and the HTTP service around them.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
