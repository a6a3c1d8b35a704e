use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use common::{TimeBucket, Track};

use crate::index::CatalogIndex;

pub const FACET_ALL: &str = "*";
pub const FACET_INSTRUMENTAL: &str = "Instrumental*";
pub const FACET_VOCAL: &str = "Vocal*";
pub const FACET_FUSION: &str = "Fusion*";
pub const FACET_FILMI: &str = "Filmi*";
pub const FACET_JUGALBANDI: &str = "Jugalbandi*";

/// A filter applied within a time bucket. Facets overlap; they are not a partition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Facet {
    All,
    Instrumental,
    Vocal,
    /// Ignores the bucket.
    Fusion,
    /// Ignores the bucket.
    Filmi,
    Jugalbandi,
    /// An exact artist or instrument name.
    Named(String),
}

impl Facet {
    pub fn parse(token: &str) -> Self {
        match token {
            FACET_ALL => Facet::All,
            FACET_INSTRUMENTAL => Facet::Instrumental,
            FACET_VOCAL => Facet::Vocal,
            FACET_FUSION => Facet::Fusion,
            FACET_FILMI => Facet::Filmi,
            FACET_JUGALBANDI => Facet::Jugalbandi,
            name => Facet::Named(name.to_string()),
        }
    }

    pub fn token(&self) -> &str {
        match self {
            Facet::All => FACET_ALL,
            Facet::Instrumental => FACET_INSTRUMENTAL,
            Facet::Vocal => FACET_VOCAL,
            Facet::Fusion => FACET_FUSION,
            Facet::Filmi => FACET_FILMI,
            Facet::Jugalbandi => FACET_JUGALBANDI,
            Facet::Named(name) => name,
        }
    }

    pub fn matches(&self, track: &Track, bucket: TimeBucket) -> bool {
        match self {
            Facet::Fusion => return track.is_fusion,
            Facet::Filmi => return track.is_filmi,
            _ => {}
        }
        if !track.in_bucket(bucket) {
            return false;
        }
        match self {
            Facet::All => true,
            Facet::Instrumental => track.is_instrumental_or_fusion(),
            Facet::Vocal => !track.is_instrumental_or_fusion(),
            Facet::Jugalbandi => track.is_jugalbandi,
            Facet::Named(name) => {
                track.has_artist(name) || track.instrument.as_deref() == Some(name.as_str())
            }
            Facet::Fusion | Facet::Filmi => false,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Album,
    Artist,
    Genre,
}

impl SearchField {
    fn value(self, track: &Track) -> &str {
        match self {
            SearchField::Title => &track.title,
            SearchField::Album => &track.album,
            SearchField::Artist => &track.artist,
            SearchField::Genre => &track.genre,
        }
    }
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(SearchField::Title),
            "album" => Ok(SearchField::Album),
            "artist" | "artists" => Ok(SearchField::Artist),
            "genre" | "raaga" => Ok(SearchField::Genre),
            other => Err(format!("unknown search field: {}", other)),
        }
    }
}

pub(crate) fn list_by_time_and_facet(
    index: &CatalogIndex,
    bucket: TimeBucket,
    facet: &Facet,
) -> Vec<Arc<Track>> {
    index
        .songs
        .iter()
        .map(|entry| entry.current())
        .filter(|track| facet.matches(track, bucket))
        .collect()
}

/// Case-insensitive substring match, in catalog order.
pub(crate) fn search(index: &CatalogIndex, field: SearchField, query: &str) -> Vec<Arc<Track>> {
    let query = query.to_lowercase();
    index
        .songs
        .iter()
        .map(|entry| entry.current())
        .filter(|track| field.value(track).to_lowercase().contains(&query))
        .collect()
}
