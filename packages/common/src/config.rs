use std::path::PathBuf;

use serde::Deserialize;

/// Upload directory configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Directory holding uploaded files, keyed by sanitized filename. Default: "./uploads".
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Largest accepted upload in bytes. Default: 64 MiB.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploads")
}
fn default_max_upload_size() -> u64 {
    64 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_upload_size: default_max_upload_size(),
        }
    }
}
