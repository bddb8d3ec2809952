use axum::Json;
use axum::body::Body;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::TryStreamExt;
use sea_orm::{ActiveModelTrait, Set};
use tokio_util::io::{ReaderStream, StreamReader};
use tracing::instrument;
use tuneful_common::storage::{BoxReader, StorageError, UploadStore};

use crate::entity::file;
use crate::error::{AppError, ErrorBody};
use crate::extractors::multipart::AppMultipart;
use crate::models::file::FileResponse;
use crate::state::AppState;
use crate::utils::filename::secure_filename;

/// Slack on top of the per-file limit for multipart framing and other fields.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

pub fn upload_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    let limit = max_upload_size.saturating_add(MULTIPART_OVERHEAD);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

#[utoipa::path(
    post,
    path = "/api/files",
    tag = "Files",
    operation_id = "uploadFile",
    summary = "Upload a file",
    description = "Stores the `file` multipart field under its sanitized filename and records it. \
        Uploading a name that already exists replaces the stored bytes and creates a new record.",
    request_body(content_type = "multipart/form-data", description = "Multipart form with a `file` field"),
    responses(
        (status = 201, description = "File stored", body = FileResponse),
        (status = 400, description = "Malformed or truncated multipart body", body = ErrorBody),
        (status = 406, description = "Client does not accept application/json", body = ErrorBody),
        (status = 413, description = "File exceeds the upload size limit", body = ErrorBody),
        (status = 415, description = "Body is not multipart/form-data", body = ErrorBody),
        (status = 422, description = "No `file` field or unusable filename", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_file(
    State(state): State<AppState>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<impl IntoResponse, AppError> {
    let mut stored: Option<(String, u64)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") || stored.is_some() {
            continue; // Ignore unknown fields and repeated files.
        }
        // A `file` field without a filename is a plain form value, not an upload.
        let Some(original) = field.file_name().map(str::to_string) else {
            continue;
        };
        let filename = secure_filename(&original)
            .map_err(|e| AppError::SchemaValidation(e.message().into()))?;

        let stream = field.map_err(std::io::Error::other);
        let reader: BoxReader<'_> = Box::new(StreamReader::new(Box::pin(stream)));
        let size = state
            .uploads
            .put_stream(&filename, reader)
            .await
            .map_err(|e| match multipart_cause(&e) {
                Some(cause) => AppError::BadRequest(format!("Multipart error: {cause}")),
                None => e.into(),
            })?;
        stored = Some((filename, size));
    }

    let (filename, size) =
        stored.ok_or_else(|| AppError::MissingField("Could not find file data".into()))?;

    let model = file::ActiveModel {
        filename: Set(filename),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;
    tracing::info!(file_id = model.id, filename = %model.filename, size, "file uploaded");

    Ok((
        StatusCode::CREATED,
        Json(FileResponse::new(model, &state.base_url())),
    ))
}

/// The multipart error behind a failed upload, if the client's body was at fault.
fn multipart_cause(err: &StorageError) -> Option<&MultipartError> {
    match err {
        StorageError::Io(e) => e.get_ref()?.downcast_ref::<MultipartError>(),
        _ => None,
    }
}

#[utoipa::path(
    get,
    path = "/uploads/{filename}",
    tag = "Files",
    operation_id = "getUploadedFile",
    summary = "Download an uploaded file",
    description = "Streams the stored bytes. The content type is guessed from the extension.",
    params(("filename" = String, Path, description = "Sanitized filename")),
    responses(
        (status = 200, description = "File content"),
        (status = 404, description = "No file stored under that name", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    // Anything the upload path could not have produced is simply absent.
    if secure_filename(&filename).ok().as_deref() != Some(filename.as_str()) {
        return Err(AppError::NotFound(format!("Could not find file {filename}")));
    }

    let size = state.uploads.size(&filename).await?;
    let reader = state.uploads.get_stream(&filename).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = mime_guess::from_path(&filename).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_LENGTH, size.to_string())
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
