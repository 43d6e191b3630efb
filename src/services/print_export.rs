//! Print-ready export at a physical size.

use std::sync::Arc;

use crate::error::{ExportError, ProcessingError};
use crate::models::{ExportConfig, PrintLayout, PrintSpec};
use crate::rendering::{self, resample};
use crate::services::Pipeline;

/// A finished print file
#[derive(Debug, Clone)]
pub struct PrintExport {
    pub png: Vec<u8>,
    pub filename: String,
    pub layout: PrintLayout,
}

/// Resamples a bitmap to the pixel size a [`PrintSpec`] calls for and
/// encodes it with DPI metadata.
pub struct PrintExporter {
    pipeline: Arc<Pipeline>,
    config: ExportConfig,
}

impl PrintExporter {
    pub fn new(pipeline: Arc<Pipeline>, config: ExportConfig) -> Self {
        Self { pipeline, config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Layout preview without a bitmap.
    pub fn layout(&self, spec: &PrintSpec, aspect: Option<f32>) -> Result<PrintLayout, ExportError> {
        validate(spec)?;
        Ok(spec.layout(aspect, self.config.quality_warning_px))
    }

    /// Export `source` (any format the loader accepts).
    pub fn export(&self, source: Option<&[u8]>, spec: &PrintSpec) -> Result<PrintExport, ExportError> {
        let source = source
            .filter(|s| !s.trim_ascii().is_empty())
            .ok_or(ExportError::NoSourceImage)?;
        validate(spec)?;

        let buffer = rendering::load(source).map_err(ProcessingError::from)?;
        let (src_w, src_h) = (buffer.width(), buffer.height());

        let width_px = spec.width_px();
        let height_px = spec.height_px(src_w, src_h).max(1);
        self.pipeline.check_dimensions(width_px, height_px)?;

        let aspect = src_h as f32 / src_w as f32;
        let mut layout = spec.layout(Some(aspect), self.config.quality_warning_px);
        layout.height_px = height_px;

        if layout.quality_warning {
            tracing::warn!(
                width_px,
                threshold = self.config.quality_warning_px,
                "Large print export, upsampling artifacts may be visible"
            );
        }

        let resized = resample::resize(buffer, width_px, height_px)?;
        let png = rendering::encode_png(&resized, Some(spec.dpi))?;

        tracing::info!(
            filename = %layout.filename,
            width_px,
            height_px,
            dpi = spec.dpi,
            bytes = png.len(),
            "Print exported"
        );

        Ok(PrintExport {
            png,
            filename: layout.filename.clone(),
            layout,
        })
    }

    pub async fn export_blocking(
        self: Arc<Self>,
        source: Option<Vec<u8>>,
        spec: PrintSpec,
    ) -> Result<PrintExport, ExportError> {
        tokio::task::spawn_blocking(move || self.export(source.as_deref(), &spec))
            .await
            .map_err(|e| ExportError::Processing(ProcessingError::Task(e.to_string())))?
    }
}

fn validate(spec: &PrintSpec) -> Result<(), ExportError> {
    if !spec.width_cm.is_finite() || spec.width_cm <= 0.0 {
        return Err(ExportError::InvalidWidth(spec.width_cm));
    }
    if spec.dpi == 0 {
        return Err(ExportError::InvalidDpi(spec.dpi));
    }
    // too narrow to cover a single pixel at this resolution
    if spec.width_px() == 0 {
        return Err(ExportError::InvalidWidth(spec.width_cm));
    }
    Ok(())
}
