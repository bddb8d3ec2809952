use serde::Serialize;

use crate::entity::file;

/// JSON representation of an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct FileResponse {
    /// File ID.
    #[schema(example = 1)]
    pub id: i32,
    /// Sanitized filename.
    #[schema(example = "test.txt")]
    pub name: String,
    /// Absolute URL the file can be downloaded from.
    #[schema(example = "http://127.0.0.1:3000/uploads/test.txt")]
    pub path: String,
}

impl FileResponse {
    /// Project a stored file, resolving its download URL against `base_url`.
    pub fn new(model: file::Model, base_url: &str) -> Self {
        let path = upload_url(base_url, &model.filename);
        Self {
            id: model.id,
            name: model.filename,
            path,
        }
    }
}

/// Download URL for an uploaded file.
///
/// Sanitized names only contain `[A-Za-z0-9_.-]`, so no escaping is needed.
pub fn upload_url(base_url: &str, filename: &str) -> String {
    format!("{base_url}/uploads/{filename}")
}
