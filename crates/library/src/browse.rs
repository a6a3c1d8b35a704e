use std::collections::HashMap;

use common::media_id;
use common::{TimeBucket, Track};
use serde::Serialize;

use crate::index::CatalogIndex;
use crate::query::{
    Facet, FACET_ALL, FACET_FILMI, FACET_FUSION, FACET_INSTRUMENTAL, FACET_JUGALBANDI,
    FACET_VOCAL,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Browsable,
    Playable,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BrowseNode {
    pub media_id: String,
    pub title: String,
    pub subtitle: String,
    pub kind: NodeKind,
}

/// Live counts behind the category nodes of one bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FacetCounts {
    pub all: usize,
    pub instrumental: usize,
    pub vocal: usize,
    pub jugalbandi: usize,
    /// Catalog-wide.
    pub fusion: usize,
    /// Catalog-wide.
    pub filmi: usize,
    pub instruments: Vec<(String, usize)>,
    pub artists: Vec<(String, usize)>,
}

impl FacetCounts {
    pub(crate) fn compute(index: &CatalogIndex, bucket: TimeBucket) -> Self {
        let mut counts = FacetCounts::default();
        let mut instruments: HashMap<&str, usize> = HashMap::new();
        let mut artists: HashMap<&str, usize> = HashMap::new();
        let tracks = index.tracks();

        for track in &tracks {
            if track.is_fusion {
                counts.fusion += 1;
            }
            if track.is_filmi {
                counts.filmi += 1;
            }
            if !track.in_bucket(bucket) {
                continue;
            }
            counts.all += 1;
            if track.is_jugalbandi {
                counts.jugalbandi += 1;
            }
            if track.is_instrumental_or_fusion() {
                counts.instrumental += 1;
            } else {
                counts.vocal += 1;
            }
            if let Some(instrument) = track.instrument.as_deref() {
                *instruments.entry(instrument).or_default() += 1;
            }
            for (position, artist) in track.artists.iter().enumerate() {
                // Once per track, matching the leaf listing.
                if track.artists[..position].contains(artist) {
                    continue;
                }
                *artists.entry(artist.as_str()).or_default() += 1;
            }
        }

        counts.instruments = in_vocabulary_order(&index.vocabulary.instruments, &instruments);
        counts.artists = in_vocabulary_order(&index.vocabulary.artists, &artists);
        counts
    }
}

fn in_vocabulary_order(vocabulary: &[String], counts: &HashMap<&str, usize>) -> Vec<(String, usize)> {
    vocabulary
        .iter()
        .filter_map(|name| {
            counts
                .get(name.as_str())
                .copied()
                .filter(|count| *count > 0)
                .map(|count| (name.clone(), count))
        })
        .collect()
}

pub(crate) fn category_nodes(index: &CatalogIndex, bucket: TimeBucket) -> Vec<BrowseNode> {
    let counts = FacetCounts::compute(index, bucket);
    let mut nodes = Vec::new();

    nodes.push(category(bucket, FACET_ALL, "All", counts.all));
    if counts.instrumental > 0 {
        nodes.push(category(
            bucket,
            FACET_INSTRUMENTAL,
            "All Instrumentals",
            counts.instrumental,
        ));
    }
    if counts.vocal > 0 {
        nodes.push(category(bucket, FACET_VOCAL, "All Vocal", counts.vocal));
    }
    nodes.push(category(bucket, FACET_FUSION, "Fusion", counts.fusion));
    if counts.jugalbandi > 0 {
        nodes.push(category(bucket, FACET_JUGALBANDI, "Jugalbandi", counts.jugalbandi));
    }
    nodes.push(category(bucket, FACET_FILMI, "Filmi", counts.filmi));
    for (name, count) in counts.instruments.iter().chain(counts.artists.iter()) {
        nodes.push(category(bucket, name, name, *count));
    }
    nodes
}

pub(crate) fn leaf_nodes(index: &CatalogIndex, bucket: TimeBucket, facet: &Facet) -> Vec<BrowseNode> {
    let parent = media_id::category_id(bucket, facet.token());
    crate::query::list_by_time_and_facet(index, bucket, facet)
        .iter()
        .map(|track| leaf(track, &parent))
        .collect()
}

fn category(bucket: TimeBucket, facet: &str, title: &str, count: usize) -> BrowseNode {
    BrowseNode {
        media_id: media_id::category_id(bucket, facet),
        title: title.to_string(),
        subtitle: songs_label(count),
        kind: NodeKind::Browsable,
    }
}

fn leaf(track: &Track, parent: &str) -> BrowseNode {
    BrowseNode {
        media_id: media_id::track_id(parent, &track.id),
        title: track.title.clone(),
        subtitle: track.genre.clone(),
        kind: NodeKind::Playable,
    }
}

fn songs_label(count: usize) -> String {
    format!("{} songs", count)
}
