//! Media ids: opaque strings naming a node in the browse hierarchy.
//!
//! `__ROOT__` is the root; `bucket/facet` names a browsable category and
//! `bucket/facet/track_id` a playable track selected from that category.

use crate::TimeBucket;

pub const ROOT: &str = "__ROOT__";
pub const DELIMITER: char = '/';

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaId {
    Root,
    Category {
        bucket: String,
        facet: String,
    },
    Track {
        bucket: String,
        facet: String,
        track_id: String,
    },
}

impl MediaId {
    pub fn encode(&self) -> String {
        match self {
            MediaId::Root => ROOT.to_string(),
            MediaId::Category { bucket, facet } => encode(&[bucket.as_str(), facet.as_str()]),
            MediaId::Track {
                bucket,
                facet,
                track_id,
            } => encode(&[bucket.as_str(), facet.as_str(), track_id.as_str()]),
        }
    }

    pub fn time_bucket(&self) -> Option<TimeBucket> {
        match self {
            MediaId::Root => None,
            MediaId::Category { bucket, .. } | MediaId::Track { bucket, .. } => {
                bucket.parse().ok()
            }
        }
    }
}

pub fn encode<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for (index, segment) in segments.iter().enumerate() {
        if index > 0 {
            out.push(DELIMITER);
        }
        out.push_str(segment.as_ref());
    }
    out
}

pub fn decode(media_id: &str) -> Vec<String> {
    media_id.split(DELIMITER).map(str::to_string).collect()
}

pub fn category_id(bucket: TimeBucket, facet: &str) -> String {
    encode(&[bucket.code(), facet])
}

/// Leaf id for `track_id` under the category `parent`.
pub fn track_id(parent: &str, track_id: &str) -> String {
    encode(&[parent, track_id])
}

pub fn is_browsable(media_id: &str) -> bool {
    media_id == ROOT || media_id.split(DELIMITER).count() == 2
}

/// Anything past the second delimiter belongs to the track id.
pub fn parse(media_id: &str) -> Option<MediaId> {
    if media_id == ROOT {
        return Some(MediaId::Root);
    }
    let mut parts = media_id.splitn(3, DELIMITER);
    let bucket = parts.next().filter(|value| !value.is_empty())?;
    let facet = parts.next().filter(|value| !value.is_empty())?;
    match parts.next() {
        None => Some(MediaId::Category {
            bucket: bucket.to_string(),
            facet: facet.to_string(),
        }),
        Some(track_id) if !track_id.is_empty() => Some(MediaId::Track {
            bucket: bucket.to_string(),
            facet: facet.to_string(),
            track_id: track_id.to_string(),
        }),
        Some(_) => None,
    }
}

pub fn extract_track_id(media_id: &str) -> Option<String> {
    match parse(media_id)? {
        MediaId::Track { track_id, .. } => Some(track_id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reverses_encode() {
        let segments = ["03-06", "Instrumental*", "song-17"];
        let id = encode(&segments);
        assert_eq!(id, "03-06/Instrumental*/song-17");
        assert_eq!(decode(&id), segments.to_vec());
    }

    #[test]
    fn round_trips_short_and_unusual_paths() {
        let cases: [&[&str]; 5] = [
            &["21-24"],
            &[ROOT],
            &["03-06", "*"],
            &["12-15", "Ravi Shankar", "raag yaman live"],
            &["12-15", "Fusion*", "take*2"],
        ];
        for segments in cases {
            let id = encode(segments);
            assert_eq!(decode(&id), segments.to_vec(), "{id}");
        }
        assert_eq!(
            extract_track_id("12-15/Ravi Shankar/raag yaman live").as_deref(),
            Some("raag yaman live")
        );
    }

    #[test]
    fn empty_sequence_decodes_to_one_empty_segment() {
        let empty: [&str; 0] = [];
        assert_eq!(encode(&empty), "");
        assert_eq!(decode(""), vec![String::new()]);
    }

    #[test]
    fn only_root_and_categories_are_browsable() {
        assert!(is_browsable(ROOT));
        assert!(is_browsable("18-21/Vocal*"));
        assert!(!is_browsable("18-21"));
        assert!(!is_browsable("18-21/Vocal*/abc"));
    }

    #[test]
    fn parses_each_level() {
        assert_eq!(parse(ROOT), Some(MediaId::Root));
        assert_eq!(
            parse("21-24/Sitar"),
            Some(MediaId::Category {
                bucket: "21-24".to_string(),
                facet: "Sitar".to_string(),
            })
        );
        let leaf = parse("21-24/Sitar/x/y").unwrap();
        assert_eq!(
            leaf,
            MediaId::Track {
                bucket: "21-24".to_string(),
                facet: "Sitar".to_string(),
                track_id: "x/y".to_string(),
            }
        );
        assert_eq!(leaf.time_bucket(), Some(TimeBucket::LateEvening));
        assert_eq!(parse("21-24"), None);
        assert_eq!(parse("21-24/"), None);
    }

    #[test]
    fn leaf_ids_extend_their_category() {
        let category = category_id(TimeBucket::Dawn, "*");
        let leaf = track_id(&category, "a");
        assert_eq!(leaf, "03-06/*/a");
        assert_eq!(extract_track_id(&leaf).as_deref(), Some("a"));
        assert_eq!(extract_track_id(&category), None);
        assert_eq!(parse(&leaf).unwrap().encode(), leaf);
    }
}
