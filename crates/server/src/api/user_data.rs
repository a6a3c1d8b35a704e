use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    Json,
};

use crate::state::{AppState, JsonResult, TrackView};
use crate::utils::{json_error, track_view};

pub async fn list_favorites(State(state): State<AppState>) -> Json<Vec<TrackView>> {
    let catalog = &state.catalog;
    let tracks = catalog
        .favorites()
        .iter()
        .filter_map(|id| catalog.get(id))
        .map(|track| track_view(catalog, &track))
        .collect();
    Json(tracks)
}

pub async fn add_favorite(
    State(state): State<AppState>,
    AxumPath(track_id): AxumPath<String>,
) -> JsonResult<()> {
    if state.catalog.get(&track_id).is_none() {
        return Err(json_error(
            StatusCode::NOT_FOUND,
            format!("track not found: {}", track_id),
        ));
    }
    state.catalog.set_favorite(&track_id, true);
    Ok(Json(()))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    AxumPath(track_id): AxumPath<String>,
) -> JsonResult<()> {
    state.catalog.set_favorite(&track_id, false);
    Ok(Json(()))
}
