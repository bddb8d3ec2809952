use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{MethodRouter, delete, get, post, put};

use crate::config::AppConfig;
use crate::handlers;
use crate::negotiation::{self, APPLICATION_JSON, MULTIPART_FORM_DATA};
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .nest("/songs", song_routes())
        .nest("/files", file_routes(config))
}

fn song_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            json_read(get(handlers::song::list_songs))
                .merge(json_write(post(handlers::song::add_song))),
        )
        .route(
            "/{id}",
            json_read(get(handlers::song::get_song))
                .merge(json_write(put(handlers::song::edit_song)))
                .merge(json_read(delete(handlers::song::delete_song))),
        )
}

fn file_routes(config: &AppConfig) -> Router<AppState> {
    Router::new().route(
        "/",
        post(handlers::file::upload_file)
            .layer(handlers::file::upload_body_limit(
                config.storage.max_upload_size,
            ))
            .layer(from_fn_with_state(APPLICATION_JSON, negotiation::accept))
            .layer(from_fn_with_state(
                MULTIPART_FORM_DATA,
                negotiation::require,
            )),
    )
}

/// Answer in JSON only.
fn json_read(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.layer(from_fn_with_state(APPLICATION_JSON, negotiation::accept))
}

/// Answer in JSON and take a JSON body. `Accept` is checked first.
fn json_write(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route
        .layer(from_fn_with_state(APPLICATION_JSON, negotiation::require))
        .layer(from_fn_with_state(APPLICATION_JSON, negotiation::accept))
}
