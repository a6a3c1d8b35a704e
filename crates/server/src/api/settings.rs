use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, warn};

use crate::config::save_config;
use crate::state::{AppState, JsonResult, SourceSettingsResponse};
use crate::utils::json_error;

pub async fn get_source(State(state): State<AppState>) -> Json<SourceSettingsResponse> {
    Json(SourceSettingsResponse {
        remote: state.config.read().source_remote,
    })
}

/// Flips between shared links and the local share, persists it, and rebuilds.
pub async fn toggle_source(State(state): State<AppState>) -> JsonResult<SourceSettingsResponse> {
    let snapshot = {
        let mut config = state.config.write();
        config.source_remote = !config.source_remote;
        config.clone()
    };
    if let Err(err) = save_config(&state.config_path, &snapshot) {
        state.config.write().source_remote = !snapshot.source_remote;
        return Err(json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("config error: {}", err),
        ));
    }
    info!(
        "Source switched to {}",
        if snapshot.source_remote { "remote" } else { "local" }
    );

    if !state.catalog.rebuild().await {
        warn!("Catalog rebuild after source switch failed; keeping previous index");
    }
    Ok(Json(SourceSettingsResponse {
        remote: snapshot.source_remote,
    }))
}
