use axum::http::StatusCode;
use axum::Json;
use common::{TimeBucket, Track};
use library::Catalog;
use tracing::info;

use crate::state::{ErrorResponse, TrackView};

pub fn json_error(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub fn parse_bucket(value: &str) -> Result<TimeBucket, (StatusCode, Json<ErrorResponse>)> {
    value
        .parse::<TimeBucket>()
        .map_err(|err| json_error(StatusCode::BAD_REQUEST, err.to_string()))
}

pub fn track_view(catalog: &Catalog, track: &Track) -> TrackView {
    TrackView {
        duration: format_duration_ms(track.duration_ms),
        favorite: catalog.is_favorite(&track.id),
        has_art: track.art.is_some(),
        track: track.clone(),
    }
}

/// Queries answer from whatever is loaded; a cold catalog starts building.
pub fn warm_up(catalog: &Catalog) {
    if catalog.is_initialized() {
        return;
    }
    catalog.retrieve_async(|ready| {
        info!("Background catalog load finished (ready: {})", ready);
    });
}

pub fn format_duration_ms(duration_ms: u64) -> String {
    if duration_ms == 0 {
        return "-".to_string();
    }
    let total_secs = duration_ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
