use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::Json;
use common::Track;
use library::Catalog;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub config_path: PathBuf,
    pub config: Arc<RwLock<ServerConfig>>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct CatalogStatusResponse {
    pub status: String,
    pub tracks: usize,
    pub favorites: usize,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
}

#[derive(Serialize)]
pub struct SourceSettingsResponse {
    pub remote: bool,
}

#[derive(Serialize)]
pub struct TrackView {
    #[serde(flatten)]
    pub track: Track,
    pub duration: String,
    pub favorite: bool,
    pub has_art: bool,
}

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub media_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FacetQuery {
    pub bucket: String,
    pub facet: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub field: Option<String>,
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ShuffleQuery {
    pub mode: Option<String>,
    pub bucket: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    pub media_id: String,
}

pub type JsonResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;
