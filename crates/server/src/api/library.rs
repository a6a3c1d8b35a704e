use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    Json,
};
use library::{Facet, SearchField};

use crate::shuffle::{build_shuffle_queue, ShuffleError, ShuffleMode};
use crate::state::{AppState, FacetQuery, JsonResult, SearchQuery, ShuffleQuery, TrackView};
use crate::utils::{json_error, parse_bucket, track_view, warm_up};

pub async fn get_track(
    State(state): State<AppState>,
    AxumPath(track_id): AxumPath<String>,
) -> JsonResult<TrackView> {
    warm_up(&state.catalog);
    match state.catalog.get(&track_id) {
        Some(track) => Ok(Json(track_view(&state.catalog, &track))),
        None => Err(json_error(
            StatusCode::NOT_FOUND,
            format!("track not found: {}", track_id),
        )),
    }
}

pub async fn list_tracks(
    State(state): State<AppState>,
    Query(params): Query<FacetQuery>,
) -> JsonResult<Vec<TrackView>> {
    let bucket = parse_bucket(&params.bucket)?;
    let facet = params
        .facet
        .as_deref()
        .map(Facet::parse)
        .unwrap_or(Facet::All);
    warm_up(&state.catalog);
    let tracks = state.catalog.list_by_time_and_facet(bucket, &facet);
    Ok(Json(
        tracks
            .iter()
            .map(|track| track_view(&state.catalog, track))
            .collect(),
    ))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> JsonResult<Vec<TrackView>> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(json_error(
            StatusCode::BAD_REQUEST,
            "query is required".to_string(),
        ));
    }
    let field = match params.field.as_deref() {
        Some(value) => value
            .parse::<SearchField>()
            .map_err(|err| json_error(StatusCode::BAD_REQUEST, err))?,
        None => SearchField::Title,
    };
    warm_up(&state.catalog);
    let tracks = state.catalog.search(field, query);
    Ok(Json(
        tracks
            .iter()
            .map(|track| track_view(&state.catalog, track))
            .collect(),
    ))
}

pub async fn shuffle_tracks(
    State(state): State<AppState>,
    Query(params): Query<ShuffleQuery>,
) -> JsonResult<Vec<TrackView>> {
    let mode = ShuffleMode::parse(params.mode.as_deref().unwrap_or("all"))
        .ok_or_else(|| json_error(StatusCode::BAD_REQUEST, "invalid shuffle mode".to_string()))?;
    let bucket = match params.bucket.as_deref() {
        Some(value) => Some(parse_bucket(value)?),
        None => None,
    };
    warm_up(&state.catalog);
    let tracks = build_shuffle_queue(&state.catalog, mode, bucket, params.genre.as_deref())
        .map_err(|err| match err {
            ShuffleError::MissingGenre => {
                json_error(StatusCode::BAD_REQUEST, "genre is required".to_string())
            }
        })?;
    Ok(Json(
        tracks
            .iter()
            .map(|track| track_view(&state.catalog, track))
            .collect(),
    ))
}

pub async fn list_genres(State(state): State<AppState>) -> Json<Vec<String>> {
    warm_up(&state.catalog);
    Json(state.catalog.genres())
}

pub async fn list_genre_tracks(
    State(state): State<AppState>,
    AxumPath(genre): AxumPath<String>,
) -> Json<Vec<TrackView>> {
    warm_up(&state.catalog);
    let tracks = state.catalog.by_genre(&genre);
    Json(
        tracks
            .iter()
            .map(|track| track_view(&state.catalog, track))
            .collect(),
    )
}
