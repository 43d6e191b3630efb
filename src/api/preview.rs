use axum::{
    extract::State,
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::process::{png_response, ProcessBody, X_IMAGE_HEIGHT, X_IMAGE_WIDTH};
use crate::error::ApiError;
use crate::services::PreviewScheduler;

pub const X_GENERATION: HeaderName = HeaderName::from_static("x-generation");

/// Response from a preview submission
#[derive(Debug, Serialize, ToSchema)]
pub struct PreviewAccepted {
    /// Generation assigned to the submission
    pub generation: u64,
}

/// Submit a preview render
///
/// Rapid submissions are coalesced; only the latest one is rendered once
/// submissions pause.
#[utoipa::path(
    post,
    path = "/api/preview",
    request_body = ProcessBody,
    responses(
        (status = 202, description = "Queued", body = PreviewAccepted),
    ),
    tag = "Preview"
)]
pub async fn handle_submit_preview(
    State(scheduler): State<Arc<PreviewScheduler>>,
    Json(body): Json<ProcessBody>,
) -> impl IntoResponse {
    let generation = scheduler.submit(body.image.into_bytes(), body.request);
    (StatusCode::ACCEPTED, Json(PreviewAccepted { generation }))
}

/// Fetch the latest preview
#[utoipa::path(
    get,
    path = "/api/preview",
    responses(
        (status = 200, description = "Latest committed preview", content_type = "image/png",
            headers(("X-Generation" = u64, description = "Generation of this frame"))),
        (status = 404, description = "No preview rendered yet"),
    ),
    tag = "Preview"
)]
pub async fn handle_get_preview(
    State(scheduler): State<Arc<PreviewScheduler>>,
) -> Result<Response, ApiError> {
    let frame = scheduler.current().await.ok_or(ApiError::NotFound)?;

    Ok(png_response(
        StatusCode::OK,
        frame.png.clone(),
        vec![
            (X_GENERATION, frame.generation.to_string()),
            (X_IMAGE_WIDTH, frame.width.to_string()),
            (X_IMAGE_HEIGHT, frame.height.to_string()),
        ],
    ))
}
