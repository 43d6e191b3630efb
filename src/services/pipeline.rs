//! Processing pipeline orchestrator.
//!
//! ```text
//! decode ─▶ resample (×upscale) ─▶ matte? ─▶ sharpen? ─▶ color ─▶ stylize? ─▶ PNG
//! ```
//!
//! Every invocation owns a fresh buffer; nothing is kept between runs.

use rand::RngCore;
use raster_fx::{remove_background, PixelBuffer, UnsharpMask};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use utoipa::ToSchema;

use crate::error::ProcessingError;
use crate::models::{EffectSettings, EnhanceSettings, PipelineConfig, SeparationSettings, Tool};
use crate::rendering::{self, resample, StyleParams};

/// Everything that selects what the pipeline does to a source
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessRequest {
    pub tool: Tool,
    pub separation: SeparationSettings,
    pub effect: EffectSettings,
    pub enhance: EnhanceSettings,
}

/// Encoded pipeline output
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub struct Pipeline {
    limits: PipelineConfig,
}

impl Pipeline {
    pub fn new(limits: PipelineConfig) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &PipelineConfig {
        &self.limits
    }

    /// Reject canvases over the configured side or pixel limits.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<(), ProcessingError> {
        let pixels = width as u64 * height as u64;
        if width == 0
            || height == 0
            || width > self.limits.max_dimension
            || height > self.limits.max_dimension
            || pixels > self.limits.max_pixels
        {
            return Err(ProcessingError::DimensionsTooLarge {
                width,
                height,
                max_dimension: self.limits.max_dimension,
                max_pixels: self.limits.max_pixels,
            });
        }
        Ok(())
    }

    /// Decode, process and encode with a thread-local random source.
    pub fn process(
        &self,
        source: &[u8],
        request: &ProcessRequest,
    ) -> Result<ProcessedImage, ProcessingError> {
        self.process_with_rng(source, request, &mut rand::thread_rng())
    }

    pub fn process_with_rng(
        &self,
        source: &[u8],
        request: &ProcessRequest,
        rng: &mut dyn RngCore,
    ) -> Result<ProcessedImage, ProcessingError> {
        let started = Instant::now();
        let buffer = rendering::load(source)?;
        self.check_dimensions(buffer.width(), buffer.height())?;

        let buffer = self.process_buffer(buffer, request, rng)?;
        let png = rendering::encode_png(&buffer, None)?;

        tracing::info!(
            tool = %request.tool,
            width = buffer.width(),
            height = buffer.height(),
            bytes = png.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Processed image"
        );

        Ok(ProcessedImage {
            png,
            width: buffer.width(),
            height: buffer.height(),
        })
    }

    /// Run every stage after decoding.
    pub fn process_buffer(
        &self,
        buffer: PixelBuffer,
        request: &ProcessRequest,
        rng: &mut dyn RngCore,
    ) -> Result<PixelBuffer, ProcessingError> {
        let upscale = request.enhance.upscale.get();
        let width = (buffer.width() as f64 * upscale as f64).round() as u32;
        let height = (buffer.height() as f64 * upscale as f64).round() as u32;
        self.check_dimensions(width, height)?;

        let mut buffer = resample::resize(buffer, width, height)?;

        if request.enhance.remove_bg {
            let cleared = remove_background(&mut buffer, self.limits.background_tolerance);
            tracing::debug!(cleared, "Background removed");
        }

        if let Some(mask) = UnsharpMask::for_upscale(upscale) {
            mask.apply(&mut buffer);
            tracing::debug!(strength = mask.strength, "Sharpened");
        }

        let adjustment = request.separation.adjustment();
        if adjustment.is_identity() {
            tracing::debug!("Color adjustment is identity, skipped");
        } else {
            adjustment.apply(&mut buffer);
        }

        match request.tool.stylization() {
            Some(style) => {
                let params = StyleParams::new(request.effect, upscale as f32);
                style.apply(buffer, &params, rng)
            }
            None => Ok(buffer),
        }
    }

    /// Run [`process`](Self::process) on a blocking worker thread.
    pub async fn process_blocking(
        self: Arc<Self>,
        source: Arc<Vec<u8>>,
        request: ProcessRequest,
    ) -> Result<ProcessedImage, ProcessingError> {
        tokio::task::spawn_blocking(move || self.process(&source, &request))
            .await
            .map_err(|e| ProcessingError::Task(e.to_string()))?
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
