use std::sync::Arc;

use axum::extract::{Path as AxumPath, Query, State};
use axum::Json;
use common::{media_id, Track};
use library::BrowseNode;

use crate::state::{AppState, BrowseQuery, JsonResult, QueueQuery, TrackView};
use crate::utils::{parse_bucket, track_view, warm_up};

pub async fn children(
    State(state): State<AppState>,
    Query(params): Query<BrowseQuery>,
) -> Json<Vec<BrowseNode>> {
    warm_up(&state.catalog);
    let media_id = params
        .media_id
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(media_id::ROOT);
    Json(state.catalog.children(media_id))
}

pub async fn bucket_children(
    State(state): State<AppState>,
    AxumPath(bucket): AxumPath<String>,
) -> JsonResult<Vec<BrowseNode>> {
    let bucket = parse_bucket(&bucket)?;
    warm_up(&state.catalog);
    Ok(Json(state.catalog.bucket_children(bucket)))
}

/// The category a picked media id belongs to, with the picked track first.
pub async fn queue(
    State(state): State<AppState>,
    Query(params): Query<QueueQuery>,
) -> Json<Vec<TrackView>> {
    warm_up(&state.catalog);
    let mut tracks = state.catalog.queue_for(&params.media_id);
    if let Some(track_id) = media_id::extract_track_id(&params.media_id) {
        rotate_to(&mut tracks, &track_id);
    }
    Json(
        tracks
            .iter()
            .map(|track| track_view(&state.catalog, track))
            .collect(),
    )
}

fn rotate_to(tracks: &mut [Arc<Track>], track_id: &str) {
    if let Some(position) = tracks.iter().position(|track| track.id == track_id) {
        tracks.rotate_left(position);
    }
}
