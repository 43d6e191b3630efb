use axum::{
    extract::{Query, State},
    http::{header, HeaderName, StatusCode},
    response::{Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::process::png_response;
use crate::error::ApiError;
use crate::models::{PrintLayout, PrintLocation, PrintSpec, ShirtSize};
use crate::services::PrintExporter;

pub const X_QUALITY_WARNING: HeaderName = HeaderName::from_static("x-quality-warning");
pub const X_PRINT_WIDTH_PX: HeaderName = HeaderName::from_static("x-print-width-px");
pub const X_PRINT_HEIGHT_PX: HeaderName = HeaderName::from_static("x-print-height-px");

/// Request body for print export
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportBody {
    /// Source image as a data URI or bare base64
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub shirt_size: Option<ShirtSize>,
    #[serde(default)]
    pub location: Option<PrintLocation>,
    /// Overrides the garment preset width
    #[serde(default)]
    pub width_cm: Option<f32>,
    #[serde(default)]
    pub dpi: Option<u32>,
}

/// Query parameters for the layout preview
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LayoutQuery {
    pub shirt_size: Option<ShirtSize>,
    pub location: Option<PrintLocation>,
    /// Overrides the garment preset width
    pub width_cm: Option<f32>,
    pub dpi: Option<u32>,
    /// Source height / width; 1.2 when omitted
    pub aspect: Option<f32>,
}

fn build_spec(
    shirt_size: Option<ShirtSize>,
    location: Option<PrintLocation>,
    width_cm: Option<f32>,
    dpi: Option<u32>,
    default_dpi: u32,
) -> PrintSpec {
    let mut spec = PrintSpec::new(shirt_size.unwrap_or_default(), location.unwrap_or_default())
        .with_dpi(dpi.unwrap_or(default_dpi));
    if let Some(width_cm) = width_cm {
        spec.set_width_cm(width_cm);
    }
    spec
}

/// Export a print-ready PNG
///
/// Resamples the image to the physical print size and returns it as a PNG
/// attachment carrying DPI metadata.
#[utoipa::path(
    post,
    path = "/api/export",
    request_body = ExportBody,
    responses(
        (status = 200, description = "Print file", content_type = "image/png",
            headers(
                ("Content-Disposition" = String, description = "Attachment with the print filename"),
                ("X-Quality-Warning" = bool, description = "Width exceeds the quality threshold"),
                ("X-Print-Width-Px" = u32, description = "Output width in pixels"),
                ("X-Print-Height-Px" = u32, description = "Output height in pixels"),
            )),
        (status = 400, description = "No source image, invalid width or DPI"),
        (status = 500, description = "Export failed"),
    ),
    tag = "Export"
)]
pub async fn handle_export(
    State(exporter): State<Arc<PrintExporter>>,
    Json(body): Json<ExportBody>,
) -> Result<Response, ApiError> {
    let spec = build_spec(
        body.shirt_size,
        body.location,
        body.width_cm,
        body.dpi,
        exporter.config().default_dpi,
    );
    let source = body.image.map(String::into_bytes);

    let export = exporter.export_blocking(source, spec).await?;
    let layout = export.layout;

    Ok(png_response(
        StatusCode::OK,
        export.png,
        vec![
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
            (X_QUALITY_WARNING, layout.quality_warning.to_string()),
            (X_PRINT_WIDTH_PX, layout.width_px.to_string()),
            (X_PRINT_HEIGHT_PX, layout.height_px.to_string()),
        ],
    ))
}

/// Preview the print layout
///
/// Computes sizes without rendering anything.
#[utoipa::path(
    get,
    path = "/api/print/layout",
    params(LayoutQuery),
    responses(
        (status = 200, description = "Computed layout", body = PrintLayout),
        (status = 400, description = "Invalid width or DPI"),
    ),
    tag = "Export"
)]
pub async fn handle_layout(
    State(exporter): State<Arc<PrintExporter>>,
    Query(query): Query<LayoutQuery>,
) -> Result<Json<PrintLayout>, ApiError> {
    let spec = build_spec(
        query.shirt_size,
        query.location,
        query.width_cm,
        query.dpi,
        exporter.config().default_dpi,
    );
    Ok(Json(exporter.layout(&spec, query.aspect)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_spec_defaults() {
        let spec = build_spec(None, None, None, None, 300);
        assert_eq!(spec.shirt_size, ShirtSize::M);
        assert_eq!(spec.location, PrintLocation::FrontCenter);
        assert_eq!(spec.width_cm, 28.0);
        assert_eq!(spec.dpi, 300);
    }

    #[test]
    fn test_build_spec_override_wins_over_preset() {
        let spec = build_spec(
            Some(ShirtSize::Xl),
            Some(PrintLocation::FrontPocket),
            Some(12.5),
            Some(150),
            300,
        );
        assert_eq!(spec.width_cm, 12.5);
        assert_eq!(spec.dpi, 150);
    }
}
