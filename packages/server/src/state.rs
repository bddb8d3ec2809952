use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tuneful_common::storage::UploadStore;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub uploads: Arc<dyn UploadStore>,
    pub config: AppConfig,
}

impl AppState {
    /// Base URL for links embedded in representations and `Location` headers.
    pub fn base_url(&self) -> String {
        self.config.server.base_url()
    }
}
