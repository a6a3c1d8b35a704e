use axum::{extract::State, Json};

use crate::state::{AppState, CatalogStatusResponse, ReadyResponse};

pub async fn status(State(state): State<AppState>) -> Json<CatalogStatusResponse> {
    let catalog = &state.catalog;
    Json(CatalogStatusResponse {
        status: catalog.state().to_string(),
        tracks: catalog.track_count(),
        favorites: catalog.favorites().len(),
    })
}

/// Joins or starts the initial build; a failed catalog retries here.
pub async fn refresh(State(state): State<AppState>) -> Json<ReadyResponse> {
    let ready = state.catalog.ensure_ready().await;
    Json(ReadyResponse { ready })
}

pub async fn rebuild(State(state): State<AppState>) -> Json<ReadyResponse> {
    let ready = state.catalog.rebuild().await;
    Json(ReadyResponse { ready })
}
