use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::file::FileResponse;
use crate::entity::{file, song};

/// Reference to an uploaded file inside a song payload.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct FileRef {
    #[schema(example = 1)]
    pub id: f64,
}

/// Body of `POST /api/songs` and `PUT /api/songs/{id}`.
///
/// Handlers receive the body as raw JSON and run it through
/// [`validate_song_payload`](super::schema::validate_song_payload) first;
/// this type documents the accepted shape.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SongRequest {
    pub file: FileRef,
}

impl SongRequest {
    /// Read the referenced file id out of a payload that passed validation.
    ///
    /// Returns `None` when the number cannot be a file id, i.e. it is
    /// fractional or outside the `i32` range.
    pub fn file_id(payload: &Value) -> Option<i32> {
        let id = &payload["file"]["id"];
        match id.as_i64() {
            Some(n) => i32::try_from(n).ok(),
            None => id
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
                .map(|f| f as i32),
        }
    }
}

/// JSON representation of a song with its file embedded.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct SongResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub file: FileResponse,
}

impl SongResponse {
    /// Project a song together with the file it references.
    pub fn new(song: &song::Model, file: file::Model, base_url: &str) -> Self {
        debug_assert_eq!(song.original_file_id, file.id);
        Self {
            id: song.id,
            file: FileResponse::new(file, base_url),
        }
    }
}
