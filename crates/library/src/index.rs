use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use common::{SongData, TimeBucket, Track, TrackArt, Vocabulary};
use parking_lot::RwLock;
use tracing::warn;

use crate::builder::build_track;
use crate::CatalogError;

/// Store-owned holder for one track. Art is replaced copy-on-write under the
/// entry's own lock, so updates to different tracks never contend.
#[derive(Debug)]
pub struct TrackEntry {
    track: RwLock<Arc<Track>>,
}

impl TrackEntry {
    fn new(track: Track) -> Self {
        Self {
            track: RwLock::new(Arc::new(track)),
        }
    }

    pub fn current(&self) -> Arc<Track> {
        Arc::clone(&self.track.read())
    }

    pub(crate) fn set_art(&self, art: Option<TrackArt>) {
        let mut guard = self.track.write();
        let mut updated = Track::clone(&guard);
        updated.art = art;
        *guard = Arc::new(updated);
    }
}

/// One immutable generation of the catalog. Published whole, never mutated
/// after publication apart from per-entry art.
#[derive(Debug, Default)]
pub(crate) struct CatalogIndex {
    pub songs: Vec<Arc<TrackEntry>>,
    pub by_id: HashMap<String, Arc<TrackEntry>>,
    pub by_genre: BTreeMap<String, Vec<Arc<TrackEntry>>>,
    pub by_time: HashMap<TimeBucket, Vec<Arc<TrackEntry>>>,
    pub vocabulary: Vocabulary,
}

impl CatalogIndex {
    pub fn build(
        data: &SongData,
        remote: bool,
        local_url_template: &str,
    ) -> Result<Self, CatalogError> {
        let mut index = CatalogIndex {
            vocabulary: Vocabulary::from_song_data(data),
            ..CatalogIndex::default()
        };
        for song in &data.songs {
            let track = build_track(song, remote, local_url_template)?;
            if index.by_id.contains_key(&track.id) {
                warn!("duplicate song id {}; keeping the first entry", track.id);
                continue;
            }
            let entry = Arc::new(TrackEntry::new(track));
            index.by_id.insert(song.id.clone(), Arc::clone(&entry));
            index.songs.push(entry);
        }
        index.rebuild_derived_indexes();
        Ok(index)
    }

    fn rebuild_derived_indexes(&mut self) {
        let mut by_genre: BTreeMap<String, Vec<Arc<TrackEntry>>> = BTreeMap::new();
        let mut by_time: HashMap<TimeBucket, Vec<Arc<TrackEntry>>> = HashMap::new();
        for entry in &self.songs {
            let track = entry.current();
            by_genre
                .entry(track.genre.clone())
                .or_default()
                .push(Arc::clone(entry));
            if let Some(bucket) = track.time {
                by_time.entry(bucket).or_default().push(Arc::clone(entry));
            }
        }
        self.by_genre = by_genre;
        self.by_time = by_time;
    }

    /// Carries art attached to the previous generation over to tracks that survive.
    pub fn adopt_art(&self, previous: &CatalogIndex) {
        for (id, entry) in &previous.by_id {
            let art = entry.current().art.clone();
            if art.is_none() {
                continue;
            }
            if let Some(next) = self.by_id.get(id) {
                next.set_art(art);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<Track>> {
        self.by_id.get(id).map(|entry| entry.current())
    }

    pub fn tracks(&self) -> Vec<Arc<Track>> {
        self.songs.iter().map(|entry| entry.current()).collect()
    }
}

pub(crate) fn resolve(entries: Option<&Vec<Arc<TrackEntry>>>) -> Vec<Arc<Track>> {
    entries
        .map(|entries| entries.iter().map(|entry| entry.current()).collect())
        .unwrap_or_default()
}
