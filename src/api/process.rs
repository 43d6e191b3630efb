use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::services::{Pipeline, ProcessRequest};

pub const X_IMAGE_WIDTH: HeaderName = HeaderName::from_static("x-image-width");
pub const X_IMAGE_HEIGHT: HeaderName = HeaderName::from_static("x-image-height");

/// Request body for pipeline runs
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessBody {
    /// Source image as a data URI or bare base64
    pub image: String,
    #[serde(flatten)]
    pub request: ProcessRequest,
}

/// PNG body with the given extra headers
pub(crate) fn png_response(
    status: StatusCode,
    png: Vec<u8>,
    headers: Vec<(HeaderName, String)>,
) -> Response {
    let mut response = (
        status,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_LENGTH, png.len().to_string()),
        ],
        Bytes::from(png),
    )
        .into_response();

    for (name, value) in headers {
        if let Ok(value) = value.parse() {
            response.headers_mut().insert(name, value);
        }
    }
    response
}

/// Run the processing pipeline
///
/// Applies the selected tool to the image and returns the result as PNG.
#[utoipa::path(
    post,
    path = "/api/process",
    request_body = ProcessBody,
    responses(
        (status = 200, description = "Processed image", content_type = "image/png",
            headers(
                ("X-Image-Width" = u32, description = "Output width in pixels"),
                ("X-Image-Height" = u32, description = "Output height in pixels"),
            )),
        (status = 400, description = "Undecodable image or dimensions over the limit"),
        (status = 500, description = "Processing failed"),
    ),
    tag = "Processing"
)]
pub async fn handle_process(
    State(pipeline): State<Arc<Pipeline>>,
    Json(body): Json<ProcessBody>,
) -> Result<Response, ApiError> {
    let image = pipeline
        .process_blocking(Arc::new(body.image.into_bytes()), body.request)
        .await?;

    Ok(png_response(
        StatusCode::OK,
        image.png,
        vec![
            (X_IMAGE_WIDTH, image.width.to_string()),
            (X_IMAGE_HEIGHT, image.height.to_string()),
        ],
    ))
}
