use std::sync::Arc;

use common::{TimeBucket, Track};
use library::Catalog;
use rand::seq::SliceRandom;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShuffleMode {
    All,
    Bucket,
    Genre,
    Favorites,
}

impl ShuffleMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" | "any" | "random" => Some(Self::All),
            "bucket" | "time" | "now" => Some(Self::Bucket),
            "genre" | "raaga" => Some(Self::Genre),
            "favorites" | "likes" => Some(Self::Favorites),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ShuffleError {
    MissingGenre,
}

/// Random play order for a slice of the catalog. `bucket` defaults to now.
pub fn build_shuffle_queue(
    catalog: &Catalog,
    mode: ShuffleMode,
    bucket: Option<TimeBucket>,
    genre: Option<&str>,
) -> Result<Vec<Arc<Track>>, ShuffleError> {
    if mode == ShuffleMode::All {
        return Ok(catalog.shuffled());
    }
    let mut tracks = match mode {
        ShuffleMode::Bucket => catalog.by_time_bucket(bucket.unwrap_or_else(TimeBucket::now)),
        ShuffleMode::Genre => {
            let genre = genre
                .map(str::trim)
                .filter(|genre| !genre.is_empty())
                .ok_or(ShuffleError::MissingGenre)?;
            catalog.by_genre(genre)
        }
        ShuffleMode::Favorites => catalog
            .favorites()
            .iter()
            .filter_map(|id| catalog.get(id))
            .collect(),
        ShuffleMode::All => Vec::new(),
    };

    let mut rng = rand::rng();
    tracks.shuffle(&mut rng);
    Ok(tracks)
}
