use common::{RawSong, TimeBucket, Track, DEFAULT_GENRE};
use tracing::warn;

use crate::CatalogError;

pub const DEFAULT_LOCAL_URL_TEMPLATE: &str =
    "http://readyshare.routerlogin.net/shares/data/classical/songs/{id}.mp3";

const SHARE_LINK_PREVIEW: &str = "?dl=0";
const SHARE_LINK_DOWNLOAD: &str = "?dl=1";

pub fn build_track(
    song: &RawSong,
    remote: bool,
    local_url_template: &str,
) -> Result<Track, CatalogError> {
    if song.id.trim().is_empty() {
        return Err(CatalogError::MalformedSource(format!(
            "song '{}' has no id",
            song.title
        )));
    }
    let source_url = resolve_source_url(song, remote, local_url_template)?;
    let artists = song.artists.clone().unwrap_or_default();
    let time = match song.time.as_deref() {
        Some(label) => match label.parse::<TimeBucket>() {
            Ok(bucket) => Some(bucket),
            Err(err) => {
                warn!("song {}: {}; leaving it out of time browsing", song.id, err);
                None
            }
        },
        None => None,
    };

    Ok(Track {
        id: song.id.clone(),
        title: song.title.clone(),
        album: song.album.clone(),
        genre: song
            .raaga
            .clone()
            .unwrap_or_else(|| DEFAULT_GENRE.to_string()),
        taal: song.taal.clone(),
        duration_ms: song.duration,
        artist: join_artists(&artists),
        artists,
        instrument: song.instrument.clone(),
        time,
        is_fusion: song.is_fusion,
        is_instrumental: song.is_instrumental,
        is_filmi: song.is_filmi,
        is_jugalbandi: song.is_jugalbandi,
        source_url,
        art: None,
    })
}

pub fn resolve_source_url(
    song: &RawSong,
    remote: bool,
    local_url_template: &str,
) -> Result<String, CatalogError> {
    if !remote {
        return Ok(local_url_template.replace("{id}", &song.id));
    }
    match song.url.as_deref() {
        Some(url) if !url.trim().is_empty() => {
            Ok(url.replace(SHARE_LINK_PREVIEW, SHARE_LINK_DOWNLOAD))
        }
        _ => Err(CatalogError::MalformedSource(format!(
            "song {} has no remote url",
            song.id
        ))),
    }
}

pub fn join_artists(artists: &[String]) -> String {
    artists.join(",")
}
