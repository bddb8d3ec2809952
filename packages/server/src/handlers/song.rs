use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set, TransactionTrait};
use serde_json::Value;
use tracing::instrument;

use crate::entity::{file, song};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::schema::validate_song_payload;
use crate::models::song::{SongRequest, SongResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/songs",
    tag = "Songs",
    operation_id = "listSongs",
    summary = "List all songs",
    description = "Returns every song ordered by ascending id, each with its file embedded.",
    responses(
        (status = 200, description = "List of songs", body = [SongResponse]),
        (status = 406, description = "Client does not accept application/json", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_songs(State(state): State<AppState>) -> Result<Json<Vec<SongResponse>>, AppError> {
    let rows = song::Entity::find()
        .find_also_related(file::Entity)
        .order_by_asc(song::Column::Id)
        .all(&state.db)
        .await?;

    let base_url = state.base_url();
    rows.into_iter()
        .map(|(s, file)| {
            let file = file.ok_or_else(|| broken_reference(&s))?;
            Ok(SongResponse::new(&s, file, &base_url))
        })
        .collect::<Result<Vec<_>, AppError>>()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/songs/{id}",
    tag = "Songs",
    operation_id = "getSong",
    summary = "Get a song by ID",
    params(("id" = i32, Path, description = "Song ID")),
    responses(
        (status = 200, description = "Song details", body = SongResponse),
        (status = 404, description = "Song not found", body = ErrorBody),
        (status = 406, description = "Client does not accept application/json", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_song(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<SongResponse>, AppError> {
    let model = find_song(&state.db, id).await?;
    Ok(Json(represent(&state, &state.db, &model).await?))
}

#[utoipa::path(
    post,
    path = "/api/songs",
    tag = "Songs",
    operation_id = "addSong",
    summary = "Add a song",
    description = "Creates a song referencing an uploaded file. The file must exist.",
    request_body = SongRequest,
    responses(
        (status = 201, description = "Song created", body = SongResponse,
            headers(("Location" = String, description = "URL of the songs collection"))),
        (status = 404, description = "Referenced file not found", body = ErrorBody),
        (status = 406, description = "Client does not accept application/json", body = ErrorBody),
        (status = 415, description = "Body is not application/json", body = ErrorBody),
        (status = 422, description = "Body does not match the song schema", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn add_song(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    validate_song_payload(&payload)?;

    let txn = state.db.begin().await?;

    let file = find_referenced_file(&txn, &payload).await?;
    let model = song::ActiveModel {
        original_file_id: Set(file.id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    tracing::info!(song_id = model.id, file_id = file.id, "song created");

    let base_url = state.base_url();
    let location = format!("{base_url}/api/songs");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(SongResponse::new(&model, file, &base_url)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/songs/{id}",
    tag = "Songs",
    operation_id = "editSong",
    summary = "Edit a song",
    description = "Points an existing song at a different uploaded file.",
    params(("id" = i32, Path, description = "Song ID")),
    request_body = SongRequest,
    responses(
        (status = 200, description = "Song updated", body = SongResponse,
            headers(("Location" = String, description = "URL of the song"))),
        (status = 404, description = "Song or referenced file not found", body = ErrorBody),
        (status = 406, description = "Client does not accept application/json", body = ErrorBody),
        (status = 415, description = "Body is not application/json", body = ErrorBody),
        (status = 422, description = "Body does not match the song schema", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn edit_song(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_song(&txn, id).await?;
    validate_song_payload(&payload)?;
    let file = find_referenced_file(&txn, &payload).await?;

    let mut active: song::ActiveModel = existing.into();
    active.original_file_id = Set(file.id);
    let model = active.update(&txn).await?;

    txn.commit().await?;
    tracing::info!(song_id = model.id, file_id = file.id, "song updated");

    let base_url = state.base_url();
    let location = format!("{base_url}/api/songs/{}", model.id);
    Ok((
        StatusCode::OK,
        [(header::LOCATION, location)],
        Json(SongResponse::new(&model, file, &base_url)),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/songs/{id}",
    tag = "Songs",
    operation_id = "deleteSong",
    summary = "Delete a song",
    description = "Deletes the song and returns its last representation. The file is kept.",
    params(("id" = i32, Path, description = "Song ID")),
    responses(
        (status = 200, description = "Song deleted", body = SongResponse),
        (status = 404, description = "Song not found", body = ErrorBody),
        (status = 406, description = "Client does not accept application/json", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_song(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<SongResponse>, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_song(&txn, id).await?;
    let response = represent(&state, &txn, &existing).await?;
    song::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(song_id = id, "song deleted");

    Ok(Json(response))
}

async fn find_song<C: ConnectionTrait>(db: &C, id: i32) -> Result<song::Model, AppError> {
    song::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Could not find song with id {id}")))
}

/// Look up a file by primary key.
pub(crate) async fn find_file<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<file::Model>, AppError> {
    Ok(file::Entity::find_by_id(id).one(db).await?)
}

/// Resolve the file a validated song payload points at.
async fn find_referenced_file<C: ConnectionTrait>(
    db: &C,
    payload: &Value,
) -> Result<file::Model, AppError> {
    let not_found = || {
        AppError::NotFound(format!(
            "Could not find file with id {}",
            payload["file"]["id"]
        ))
    };
    let id = SongRequest::file_id(payload).ok_or_else(not_found)?;
    find_file(db, id).await?.ok_or_else(not_found)
}

/// Build the representation of a stored song.
async fn represent<C: ConnectionTrait>(
    state: &AppState,
    db: &C,
    model: &song::Model,
) -> Result<SongResponse, AppError> {
    let file = find_file(db, model.original_file_id)
        .await?
        .ok_or_else(|| broken_reference(model))?;
    Ok(SongResponse::new(model, file, &state.base_url()))
}

fn broken_reference(model: &song::Model) -> AppError {
    AppError::Internal(format!(
        "song {} references missing file {}",
        model.id, model.original_file_id
    ))
}
