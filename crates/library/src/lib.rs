pub mod browse;
pub mod builder;
mod favorites;
mod index;
pub mod query;
pub mod source;

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use common::media_id::{self, MediaId};
use common::{TimeBucket, Track, TrackArt, Vocabulary};
use parking_lot::{Mutex, RwLock};
use rand::seq::SliceRandom;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

pub use browse::{BrowseNode, FacetCounts, NodeKind};
pub use builder::DEFAULT_LOCAL_URL_TEMPLATE;
pub use query::{Facet, SearchField};
pub use source::{
    FileSource, FixedToggle, HttpSource, SongSource, SourceError, SourceToggle, StaticSource,
};

use crate::favorites::FavoriteSet;
use crate::index::{resolve, CatalogIndex};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("malformed source: {0}")]
    MalformedSource(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<SourceError> for CatalogError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Io(_) | SourceError::Http(_) => {
                CatalogError::SourceUnavailable(err.to_string())
            }
            SourceError::Parse(_) => CatalogError::MalformedSource(err.to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogState {
    NotInitialized,
    Initializing,
    Initialized,
}

impl fmt::Display for CatalogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CatalogState::NotInitialized => "not_initialized",
            CatalogState::Initializing => "initializing",
            CatalogState::Initialized => "initialized",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug)]
pub struct CatalogSettings {
    pub local_url_template: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            local_url_template: DEFAULT_LOCAL_URL_TEMPLATE.to_string(),
        }
    }
}

/// `None` until the in-flight build finishes, then whether it succeeded.
type BuildOutcome = watch::Receiver<Option<bool>>;

struct Shared {
    source: Arc<dyn SongSource>,
    toggle: Arc<dyn SourceToggle>,
    settings: CatalogSettings,
    state: RwLock<CatalogState>,
    in_flight: Mutex<Option<BuildOutcome>>,
    index: RwLock<Arc<CatalogIndex>>,
    favorites: FavoriteSet,
}

/// Shared handle to the track catalog. Clones refer to the same catalog.
///
/// The catalog starts empty and is built on the first [`Catalog::ensure_ready`].
/// Reads never block on a build: before the first successful build they return
/// empty results, afterwards they see one complete generation of the indexes.
#[derive(Clone)]
pub struct Catalog {
    shared: Arc<Shared>,
}

impl Catalog {
    pub fn new(
        source: Arc<dyn SongSource>,
        toggle: Arc<dyn SourceToggle>,
        settings: CatalogSettings,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                toggle,
                settings,
                state: RwLock::new(CatalogState::NotInitialized),
                in_flight: Mutex::new(None),
                index: RwLock::new(Arc::new(CatalogIndex::default())),
                favorites: FavoriteSet::new(),
            }),
        }
    }

    pub fn state(&self) -> CatalogState {
        *self.shared.state.read()
    }

    pub fn is_initialized(&self) -> bool {
        self.state() == CatalogState::Initialized
    }

    /// Builds the catalog unless it is already built. Concurrent callers share a
    /// single build and all observe its outcome. A failed build leaves the
    /// catalog uninitialized so a later call retries.
    pub async fn ensure_ready(&self) -> bool {
        if self.is_initialized() {
            return true;
        }
        let outcome = {
            let mut in_flight = self.shared.in_flight.lock();
            match in_flight.as_ref() {
                Some(outcome) => outcome.clone(),
                None => {
                    if self.is_initialized() {
                        return true;
                    }
                    *self.shared.state.write() = CatalogState::Initializing;
                    let outcome = self.spawn_build();
                    *in_flight = Some(outcome.clone());
                    outcome
                }
            }
        };
        wait_for(outcome).await
    }

    /// Callback form of [`Catalog::ensure_ready`]. Runs `on_complete` inline when
    /// the catalog is already built; otherwise on a task of the current runtime.
    pub fn retrieve_async<F>(&self, on_complete: F)
    where
        F: FnOnce(bool) + Send + 'static,
    {
        debug!("retrieve_async called");
        if self.is_initialized() {
            on_complete(true);
            return;
        }
        let catalog = self.clone();
        tokio::spawn(async move {
            let ready = catalog.ensure_ready().await;
            on_complete(ready);
        });
    }

    /// Reloads the whole catalog from the source. Readers keep the current
    /// generation until the new one is complete; a failed reload keeps it.
    ///
    /// The result always comes from a build that started after this call, so a
    /// toggle change made before calling is reflected.
    pub async fn rebuild(&self) -> bool {
        let earlier = self.shared.in_flight.lock().clone();
        if let Some(earlier) = earlier {
            // May have read the toggle already.
            wait_for(earlier).await;
        }
        let outcome = {
            let mut in_flight = self.shared.in_flight.lock();
            match in_flight.as_ref() {
                Some(outcome) => outcome.clone(),
                None => {
                    let mut state = self.shared.state.write();
                    if *state == CatalogState::NotInitialized {
                        *state = CatalogState::Initializing;
                    }
                    drop(state);
                    let outcome = self.spawn_build();
                    *in_flight = Some(outcome.clone());
                    outcome
                }
            }
        };
        wait_for(outcome).await
    }

    /// Must be called with `in_flight` held and empty.
    fn spawn_build(&self) -> BuildOutcome {
        let (sender, receiver) = watch::channel(None);
        let completion = BuildCompletion {
            shared: Arc::clone(&self.shared),
            sender: Some(sender),
        };
        tokio::spawn(async move {
            let shared = Arc::clone(&completion.shared);
            let source = Arc::clone(&shared.source);
            let toggle = Arc::clone(&shared.toggle);
            let template = shared.settings.local_url_template.clone();
            info!("Loading catalog from {}", source.describe());
            let result = tokio::task::spawn_blocking(
                move || -> Result<CatalogIndex, CatalogError> {
                    let data = source.load()?;
                    CatalogIndex::build(&data, toggle.is_remote(), &template)
                },
            )
            .await;
            let built = match result {
                Ok(Ok(index)) => Some(index),
                Ok(Err(err)) => {
                    warn!("Catalog build failed: {}", err);
                    None
                }
                Err(err) => {
                    warn!("Catalog build join error: {}", err);
                    None
                }
            };
            completion.finish(built);
        });
        receiver
    }

    fn snapshot(&self) -> Arc<CatalogIndex> {
        Arc::clone(&self.shared.index.read())
    }

    pub fn get(&self, track_id: &str) -> Option<Arc<Track>> {
        self.snapshot().get(track_id)
    }

    pub fn track_count(&self) -> usize {
        self.snapshot().songs.len()
    }

    /// Attaches display art. An unknown id means the caller holds an id that
    /// never came from this catalog.
    pub fn set_art(
        &self,
        track_id: &str,
        full: Bytes,
        thumbnail: Bytes,
    ) -> Result<(), CatalogError> {
        // Held across the update so a concurrent publish cannot drop the art.
        let index = self.shared.index.read();
        match index.by_id.get(track_id) {
            Some(entry) => {
                entry.set_art(Some(TrackArt { full, thumbnail }));
                Ok(())
            }
            None => {
                error!("set_art for unknown track {}", track_id);
                Err(CatalogError::NotFound(track_id.to_string()))
            }
        }
    }

    pub fn set_favorite(&self, track_id: &str, favorite: bool) {
        self.shared.favorites.set(track_id, favorite);
    }

    pub fn is_favorite(&self, track_id: &str) -> bool {
        self.shared.favorites.contains(track_id)
    }

    /// Sorted favorite ids, including ids the catalog does not hold.
    pub fn favorites(&self) -> Vec<String> {
        self.shared.favorites.ids()
    }

    /// Ids in catalog order.
    pub fn all_ids(&self) -> Vec<String> {
        self.snapshot()
            .songs
            .iter()
            .map(|entry| entry.current().id.clone())
            .collect()
    }

    pub fn genres(&self) -> Vec<String> {
        self.snapshot().by_genre.keys().cloned().collect()
    }

    pub fn by_genre(&self, genre: &str) -> Vec<Arc<Track>> {
        resolve(self.snapshot().by_genre.get(genre))
    }

    pub fn by_time_bucket(&self, bucket: TimeBucket) -> Vec<Arc<Track>> {
        resolve(self.snapshot().by_time.get(&bucket))
    }

    pub fn vocabulary(&self) -> Vocabulary {
        self.snapshot().vocabulary.clone()
    }

    /// Every track, in catalog order.
    pub fn list_all(&self) -> Vec<Arc<Track>> {
        self.snapshot().tracks()
    }

    pub fn shuffled(&self) -> Vec<Arc<Track>> {
        let mut tracks = self.list_all();
        let mut rng = rand::rng();
        tracks.shuffle(&mut rng);
        tracks
    }

    pub fn search(&self, field: SearchField, query: &str) -> Vec<Arc<Track>> {
        query::search(&self.snapshot(), field, query)
    }

    pub fn search_by_title(&self, query: &str) -> Vec<Arc<Track>> {
        self.search(SearchField::Title, query)
    }

    pub fn search_by_album(&self, query: &str) -> Vec<Arc<Track>> {
        self.search(SearchField::Album, query)
    }

    pub fn search_by_artist(&self, query: &str) -> Vec<Arc<Track>> {
        self.search(SearchField::Artist, query)
    }

    pub fn search_by_genre(&self, query: &str) -> Vec<Arc<Track>> {
        self.search(SearchField::Genre, query)
    }

    pub fn list_by_time_and_facet(&self, bucket: TimeBucket, facet: &Facet) -> Vec<Arc<Track>> {
        query::list_by_time_and_facet(&self.snapshot(), bucket, facet)
    }

    pub fn facet_counts(&self, bucket: TimeBucket) -> FacetCounts {
        FacetCounts::compute(&self.snapshot(), bucket)
    }

    pub fn bucket_children(&self, bucket: TimeBucket) -> Vec<BrowseNode> {
        if !self.is_initialized() {
            return Vec::new();
        }
        browse::category_nodes(&self.snapshot(), bucket)
    }

    /// Children of a browsable media id, resolving the root against the local clock.
    pub fn children(&self, media_id: &str) -> Vec<BrowseNode> {
        self.children_at(media_id, TimeBucket::now())
    }

    /// Children of a browsable media id with the root resolved to `current`.
    pub fn children_at(&self, media_id: &str, current: TimeBucket) -> Vec<BrowseNode> {
        if !media_id::is_browsable(media_id) {
            return Vec::new();
        }
        match media_id::parse(media_id) {
            Some(MediaId::Root) => self.bucket_children(current),
            Some(MediaId::Category { bucket, facet }) => match bucket.parse::<TimeBucket>() {
                Ok(bucket) => browse::leaf_nodes(&self.snapshot(), bucket, &Facet::parse(&facet)),
                Err(err) => {
                    warn!("Skipping media id {}: {}", media_id, err);
                    Vec::new()
                }
            },
            _ => {
                warn!("Skipping unmatched media id: {}", media_id);
                Vec::new()
            }
        }
    }

    /// Tracks of the category a leaf media id was picked from, for queueing.
    pub fn queue_for(&self, media_id: &str) -> Vec<Arc<Track>> {
        match media_id::parse(media_id) {
            Some(MediaId::Track { bucket, facet, .. }) | Some(MediaId::Category { bucket, facet }) => {
                match bucket.parse::<TimeBucket>() {
                    Ok(bucket) => self.list_by_time_and_facet(bucket, &Facet::parse(&facet)),
                    Err(_) => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }
}

/// Publishes the outcome of one build task. If the task ends without calling
/// `finish` (a panic), dropping it rolls back and wakes the waiters with `false`.
struct BuildCompletion {
    shared: Arc<Shared>,
    sender: Option<watch::Sender<Option<bool>>>,
}

impl BuildCompletion {
    fn finish(mut self, built: Option<CatalogIndex>) {
        let success = built.is_some();
        {
            let mut in_flight = self.shared.in_flight.lock();
            let mut state = self.shared.state.write();
            match built {
                Some(index) => {
                    let mut current = self.shared.index.write();
                    index.adopt_art(&current);
                    info!("Catalog ready: {} tracks", index.songs.len());
                    *current = Arc::new(index);
                    *state = CatalogState::Initialized;
                }
                None => {
                    if *state == CatalogState::Initializing {
                        *state = CatalogState::NotInitialized;
                    }
                }
            }
            *in_flight = None;
        }
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(Some(success));
        }
    }
}

impl Drop for BuildCompletion {
    fn drop(&mut self) {
        let Some(sender) = self.sender.take() else {
            return;
        };
        error!("Catalog build task ended without publishing");
        {
            let mut in_flight = self.shared.in_flight.lock();
            let mut state = self.shared.state.write();
            if *state == CatalogState::Initializing {
                *state = CatalogState::NotInitialized;
            }
            *in_flight = None;
        }
        let _ = sender.send(Some(false));
    }
}

async fn wait_for(mut outcome: BuildOutcome) -> bool {
    outcome
        .wait_for(|value| value.is_some())
        .await
        .map(|value| (*value).unwrap_or(false))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use bytes::Bytes;
    use common::{RawSong, SongData, TimeBucket};
    use tokio::sync::oneshot;

    use super::{
        Catalog, CatalogError, CatalogSettings, CatalogState, Facet, FixedToggle, SongSource,
        SourceError, SourceToggle, StaticSource,
    };

    fn song(id: &str, time: &str, instrumental: bool) -> RawSong {
        RawSong {
            id: id.to_string(),
            title: format!("Song {id}"),
            album: "Album".to_string(),
            time: Some(time.to_string()),
            url: Some(format!("https://share.example/{id}.mp3?dl=0")),
            is_instrumental: instrumental,
            ..RawSong::default()
        }
    }

    fn two_songs() -> SongData {
        SongData {
            songs: vec![song("a", "03-06", true), song("b", "03-06", false)],
            ..SongData::default()
        }
    }

    /// Counts loads, sleeps to widen race windows, fails the first `failures` loads.
    struct CountingSource {
        data: SongData,
        loads: AtomicUsize,
        failures: usize,
    }

    impl CountingSource {
        fn new(data: SongData, failures: usize) -> Arc<Self> {
            Arc::new(Self {
                data,
                loads: AtomicUsize::new(0),
                failures,
            })
        }

        fn loads(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    impl SongSource for CountingSource {
        fn describe(&self) -> String {
            "counting".to_string()
        }

        fn load(&self) -> Result<SongData, SourceError> {
            let attempt = self.loads.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(50));
            if attempt < self.failures {
                return Err(SourceError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "offline",
                )));
            }
            Ok(self.data.clone())
        }
    }

    /// Holds the build for a while after the toggle has been read.
    struct SlowToggle {
        remote: AtomicBool,
    }

    impl SourceToggle for SlowToggle {
        fn is_remote(&self) -> bool {
            let remote = self.remote.load(Ordering::SeqCst);
            thread::sleep(Duration::from_millis(300));
            remote
        }
    }

    /// Panics outside the blocking load on its first use.
    struct PanicOnceSource {
        inner: StaticSource,
        panicked: AtomicBool,
    }

    impl SongSource for PanicOnceSource {
        fn describe(&self) -> String {
            if !self.panicked.swap(true, Ordering::SeqCst) {
                panic!("describe failed");
            }
            self.inner.describe()
        }

        fn load(&self) -> Result<SongData, SourceError> {
            self.inner.load()
        }
    }

    fn catalog(source: Arc<dyn SongSource>) -> Catalog {
        Catalog::new(
            source,
            Arc::new(FixedToggle::new(false)),
            CatalogSettings::default(),
        )
    }

    #[tokio::test]
    async fn reads_are_empty_before_init() {
        let catalog = catalog(Arc::new(StaticSource::from_data(&two_songs()).unwrap()));
        assert_eq!(catalog.state(), CatalogState::NotInitialized);
        assert!(catalog.get("a").is_none());
        assert!(catalog.list_all().is_empty());
        assert!(catalog.search_by_title("song").is_empty());
        assert!(catalog.children_at("__ROOT__", TimeBucket::Dawn).is_empty());
        assert!(matches!(
            catalog.set_art("a", Bytes::new(), Bytes::new()),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn reads_stay_empty_while_building() {
        let catalog = Catalog::new(
            Arc::new(StaticSource::from_data(&two_songs()).unwrap()),
            Arc::new(SlowToggle {
                remote: AtomicBool::new(false),
            }),
            CatalogSettings::default(),
        );
        let build = {
            let catalog = catalog.clone();
            tokio::spawn(async move { catalog.ensure_ready().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(catalog.state(), CatalogState::Initializing);

        let started = std::time::Instant::now();
        assert!(catalog.get("a").is_none());
        assert!(catalog.list_all().is_empty());
        assert!(catalog.search_by_title("song").is_empty());
        assert!(catalog.children_at("__ROOT__", TimeBucket::Dawn).is_empty());
        assert!(catalog.children_at("03-06/*", TimeBucket::Dawn).is_empty());
        assert!(started.elapsed() < Duration::from_millis(200));
        assert_eq!(catalog.state(), CatalogState::Initializing);

        assert!(build.await.unwrap());
        assert_eq!(catalog.track_count(), 2);
    }

    #[tokio::test]
    async fn ensure_ready_indexes_every_record() {
        let catalog = catalog(Arc::new(StaticSource::from_data(&two_songs()).unwrap()));
        assert!(catalog.ensure_ready().await);
        assert!(catalog.is_initialized());
        assert_eq!(catalog.all_ids(), vec!["a", "b"]);
        assert!(catalog.get("a").is_some());
        assert!(catalog.ensure_ready().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_build() {
        let source = CountingSource::new(two_songs(), 0);
        let catalog = catalog(source.clone());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let catalog = catalog.clone();
            handles.push(tokio::spawn(async move { catalog.ensure_ready().await }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }
        assert_eq!(source.loads(), 1);
        assert_eq!(catalog.track_count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn failed_build_rolls_back_and_retries() {
        let source = CountingSource::new(two_songs(), 1);
        let catalog = catalog(source.clone());
        let first = {
            let a = catalog.clone();
            let b = catalog.clone();
            let (x, y) = tokio::join!(a.ensure_ready(), b.ensure_ready());
            assert_eq!(x, y);
            x
        };
        assert!(!first);
        assert_eq!(catalog.state(), CatalogState::NotInitialized);
        assert!(catalog.all_ids().is_empty());
        assert_eq!(source.loads(), 1);

        assert!(catalog.ensure_ready().await);
        assert_eq!(source.loads(), 2);
        assert_eq!(catalog.track_count(), 2);
    }

    #[tokio::test]
    async fn malformed_document_fails_init() {
        let catalog = catalog(Arc::new(StaticSource::from_json("[1, 2")));
        assert!(!catalog.ensure_ready().await);
        assert!(!catalog.is_initialized());
    }

    #[tokio::test]
    async fn callback_reports_outcome() {
        let catalog = catalog(Arc::new(StaticSource::from_data(&two_songs()).unwrap()));
        let (sender, receiver) = oneshot::channel();
        catalog.retrieve_async(move |ready| {
            let _ = sender.send(ready);
        });
        assert!(receiver.await.unwrap());

        // Already built: the callback runs before retrieve_async returns.
        let (sender, receiver) = std::sync::mpsc::channel();
        catalog.retrieve_async(move |ready| {
            let _ = sender.send(ready);
        });
        assert_eq!(receiver.try_recv().ok(), Some(true));
    }

    #[tokio::test]
    async fn art_update_keeps_other_fields() {
        let catalog = catalog(Arc::new(StaticSource::from_data(&two_songs()).unwrap()));
        assert!(catalog.ensure_ready().await);
        let before = catalog.get("a").unwrap();
        catalog
            .set_art("a", Bytes::from_static(b"full"), Bytes::from_static(b"icon"))
            .unwrap();
        let after = catalog.get("a").unwrap();
        let art = after.art.as_ref().unwrap();
        assert_eq!(art.full, Bytes::from_static(b"full"));
        assert_eq!(art.thumbnail, Bytes::from_static(b"icon"));
        assert_eq!(after.title, before.title);
        assert_eq!(after.source_url, before.source_url);
        assert!(matches!(
            catalog.set_art("zzz", Bytes::new(), Bytes::new()),
            Err(CatalogError::NotFound(_))
        ));
        // Listings resolve through the holder and see the art as well.
        let listed = catalog.list_by_time_and_facet(TimeBucket::Dawn, &Facet::Instrumental);
        assert!(listed[0].art.is_some());
    }

    #[tokio::test]
    async fn favorites_are_independent_of_the_catalog() {
        let catalog = catalog(Arc::new(StaticSource::from_data(&two_songs()).unwrap()));
        catalog.set_favorite("ghost", true);
        assert!(catalog.is_favorite("ghost"));
        assert!(catalog.ensure_ready().await);
        catalog.set_favorite("b", true);
        catalog.set_favorite("ghost", false);
        assert!(catalog.rebuild().await);
        assert_eq!(catalog.favorites(), vec!["b"]);
        assert!(!catalog.is_favorite("a"));
    }

    #[tokio::test]
    async fn rebuild_applies_toggle() {
        let toggle = Arc::new(FixedToggle::new(false));
        let catalog = Catalog::new(
            Arc::new(StaticSource::from_data(&two_songs()).unwrap()),
            toggle.clone(),
            CatalogSettings::default(),
        );
        assert!(catalog.ensure_ready().await);
        assert!(catalog.get("a").unwrap().source_url.starts_with("http://readyshare"));
        toggle.set_remote(true);
        assert!(catalog.rebuild().await);
        assert_eq!(
            catalog.get("a").unwrap().source_url,
            "https://share.example/a.mp3?dl=1"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn rebuild_sees_toggle_flipped_during_a_running_build() {
        let toggle = Arc::new(SlowToggle {
            remote: AtomicBool::new(false),
        });
        let catalog = Catalog::new(
            Arc::new(StaticSource::from_data(&two_songs()).unwrap()),
            toggle.clone(),
            CatalogSettings::default(),
        );
        let first = {
            let catalog = catalog.clone();
            tokio::spawn(async move { catalog.ensure_ready().await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        toggle.remote.store(true, Ordering::SeqCst);

        assert!(catalog.rebuild().await);
        assert!(first.await.unwrap());
        assert_eq!(
            catalog.get("a").unwrap().source_url,
            "https://share.example/a.mp3?dl=1"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn panicked_build_task_allows_retry() {
        let source = Arc::new(PanicOnceSource {
            inner: StaticSource::from_data(&two_songs()).unwrap(),
            panicked: AtomicBool::new(false),
        });
        let catalog = catalog(source);
        assert!(!catalog.ensure_ready().await);
        assert_eq!(catalog.state(), CatalogState::NotInitialized);
        assert!(catalog.ensure_ready().await);
        assert_eq!(catalog.track_count(), 2);
    }

    #[tokio::test]
    async fn failed_rebuild_keeps_current_generation() {
        let mut data = two_songs();
        data.songs[1].url = None;
        let toggle = Arc::new(FixedToggle::new(false));
        let catalog = Catalog::new(
            Arc::new(StaticSource::from_data(&data).unwrap()),
            toggle.clone(),
            CatalogSettings::default(),
        );
        assert!(catalog.ensure_ready().await);
        toggle.set_remote(true);
        assert!(!catalog.rebuild().await);
        assert!(catalog.is_initialized());
        assert_eq!(catalog.track_count(), 2);
    }

    #[tokio::test]
    async fn browse_and_listing_agree() {
        let catalog = catalog(Arc::new(StaticSource::from_data(&two_songs()).unwrap()));
        assert!(catalog.ensure_ready().await);
        let root = catalog.children_at("__ROOT__", TimeBucket::Dawn);
        assert_eq!(root[0].title, "All");
        assert_eq!(root[0].subtitle, "2 songs");
        let instrumental = catalog.children_at("03-06/Instrumental*", TimeBucket::Night);
        let ids: Vec<&str> = instrumental.iter().map(|node| node.media_id.as_str()).collect();
        assert_eq!(ids, vec!["03-06/Instrumental*/a"]);
        let vocal = catalog.list_by_time_and_facet(TimeBucket::Dawn, &Facet::Vocal);
        assert_eq!(vocal.len(), 1);
        assert_eq!(vocal[0].id, "b");
        assert!(catalog.children_at("03-06/Instrumental*/a", TimeBucket::Dawn).is_empty());
        assert!(catalog.children_at("99-99/*", TimeBucket::Dawn).is_empty());
        let queue = catalog.queue_for("03-06/Instrumental*/a");
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, "a");
    }

    #[tokio::test]
    async fn shuffle_is_a_permutation() {
        let catalog = catalog(Arc::new(StaticSource::from_data(&two_songs()).unwrap()));
        assert!(catalog.ensure_ready().await);
        let mut ids: Vec<String> = catalog.shuffled().iter().map(|t| t.id.clone()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(catalog.genres(), vec!["Hindustani Classical"]);
        assert_eq!(catalog.by_genre("Hindustani Classical").len(), 2);
        assert_eq!(catalog.by_time_bucket(TimeBucket::Dawn).len(), 2);
    }
}
