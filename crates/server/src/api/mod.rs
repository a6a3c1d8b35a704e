pub mod browse;
pub mod catalog;
pub mod library;
pub mod settings;
pub mod user_data;

use axum::{
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

use crate::state::{AppState, HealthResponse};

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/catalog/status", get(catalog::status))
        .route("/catalog/refresh", post(catalog::refresh))
        .route("/catalog/rebuild", post(catalog::rebuild))
        .route("/browse", get(browse::children))
        .route("/browse/buckets/:bucket", get(browse::bucket_children))
        .route("/queue", get(browse::queue))
        .route("/tracks", get(library::list_tracks))
        .route("/tracks/:track_id", get(library::get_track))
        .route("/search", get(library::search))
        .route("/shuffle", get(library::shuffle_tracks))
        .route("/genres", get(library::list_genres))
        .route("/genres/:genre/tracks", get(library::list_genre_tracks))
        .route("/favorites", get(user_data::list_favorites))
        .route("/favorites/:track_id", post(user_data::add_favorite))
        .route("/favorites/:track_id", delete(user_data::remove_favorite))
        .route("/settings/source", get(settings::get_source))
        .route("/settings/source/toggle", post(settings::toggle_source))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}
