use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use tuneful_common::storage::StorageError;

use crate::models::schema::SchemaValidationError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Human-readable error description.
    #[schema(example = "Could not find song with id 999")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    /// Request body does not match the expected JSON shape.
    SchemaValidation(String),
    /// A required multipart field is absent.
    MissingField(String),
    BadRequest(String),
    NotFound(String),
    /// The `Accept` header rules out the given media type.
    NotAcceptable(&'static str),
    /// The `Content-Type` header is not the given media type.
    UnsupportedMediaType(&'static str),
    PayloadTooLarge(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, message) = match self {
            AppError::SchemaValidation(msg) | AppError::MissingField(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::NotAcceptable(mime) => (
                StatusCode::NOT_ACCEPTABLE,
                format!("Request must accept {mime}"),
            ),
            AppError::UnsupportedMediaType(mime) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("Request must contain {mime} data"),
            ),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".into(),
                )
            }
        };
        (status, ErrorBody { message })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<SchemaValidationError> for AppError {
    fn from(err: SchemaValidationError) -> Self {
        AppError::SchemaValidation(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(name) | StorageError::InvalidName(name) => {
                AppError::NotFound(format!("Could not find file {name}"))
            }
            StorageError::SizeLimitExceeded { limit, .. } => AppError::PayloadTooLarge(format!(
                "File exceeds maximum size of {limit} bytes"
            )),
            StorageError::Io(e) => AppError::Internal(format!("Storage IO error: {e}")),
        }
    }
}
