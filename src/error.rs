use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Admin role required")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("User already exists: {0}")]
    Conflict(String),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Processing error: {0}")]
    Processing(#[from] ProcessingError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure to turn a source into a pixel buffer.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed data URI")]
    MalformedDataUri,

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Empty image source")]
    Empty,

    #[error("Unsupported or corrupt image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image has zero dimension ({width}x{height})")]
    ZeroDimension { width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Dimensions too large: {width}x{height} (max {max_dimension} per side, {max_pixels} pixels)")]
    DimensionsTooLarge {
        width: u32,
        height: u32,
        max_dimension: u32,
        max_pixels: u64,
    },

    #[error("Failed to allocate {width}x{height} canvas")]
    CanvasAllocation { width: u32, height: u32 },

    #[error("Image encode error: {0}")]
    Encode(String),

    #[error("Worker task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No source image to export")]
    NoSourceImage,

    #[error("Invalid print width: {0} cm")]
    InvalidWidth(f32),

    #[error("Invalid DPI: {0}")]
    InvalidDpi(u32),

    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

/// Rejected credential store input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Invalid user snapshot: {0}")]
    InvalidSnapshot(String),
}

impl From<raster_fx::BufferError> for DecodeError {
    fn from(e: raster_fx::BufferError) -> Self {
        match e {
            raster_fx::BufferError::ZeroDimension { width, height } => {
                DecodeError::ZeroDimension { width, height }
            }
            raster_fx::BufferError::LengthMismatch { .. } => DecodeError::Empty,
        }
    }
}

impl ProcessingError {
    fn is_client_error(&self) -> bool {
        matches!(
            self,
            ProcessingError::Decode(_) | ProcessingError::DimensionsTooLarge { .. }
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) | ApiError::Decode(_) | ApiError::Credentials(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Processing(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Export(ExportError::Processing(e)) if e.is_client_error() => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Export(ExportError::Processing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Export(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
