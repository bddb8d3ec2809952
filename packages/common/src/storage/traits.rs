use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader<'a> = Box<dyn AsyncRead + Unpin + Send + 'a>;

/// Flat, name-keyed storage for uploaded files.
///
/// Names are expected to be sanitized by the caller. Implementations still
/// reject names that could escape the storage root.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Store data from an async reader under `name`, replacing any previous
    /// content, and return the byte count.
    ///
    /// Readers never observe a partially written file.
    async fn put_stream(&self, name: &str, reader: BoxReader<'_>) -> Result<u64, StorageError>;

    /// Open the content stored under `name` as a streaming reader.
    async fn get_stream(&self, name: &str) -> Result<BoxReader<'static>, StorageError>;

    /// Size in bytes of the content stored under `name`.
    async fn size(&self, name: &str) -> Result<u64, StorageError>;
}
