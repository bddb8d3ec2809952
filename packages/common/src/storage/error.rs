use std::fmt;

/// Errors that can occur during upload storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// No file is stored under the requested name.
    NotFound(String),
    /// The name cannot be used as a flat storage key.
    InvalidName(String),
    /// An I/O error occurred.
    Io(std::io::Error),
    /// The upload exceeds the configured size limit.
    SizeLimitExceeded { actual: u64, limit: u64 },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "upload not found: {name}"),
            Self::InvalidName(name) => write!(f, "invalid upload name: {name:?}"),
            Self::Io(err) => write!(f, "storage IO error: {err}"),
            Self::SizeLimitExceeded { actual, limit } => {
                write!(f, "upload exceeds size limit ({actual} > {limit} bytes)")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
