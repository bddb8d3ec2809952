mod api;

use axum::Router;
use axum::routing::get;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> Router<AppState> {
    Router::new().nest("/api", api::routes(config))
}

/// Raw downloads of uploaded files. No content negotiation applies here.
pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/uploads/{filename}", get(handlers::file::serve_upload))
}
