use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use tracing::debug;

pub mod media_id;

pub const DEFAULT_GENRE: &str = "Hindustani Classical";

const MINUTES_PER_DAY: u32 = 24 * 60;
const MINUTES_PER_BUCKET: u32 = 180;

/// Raw catalog document as produced by a song source.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SongData {
    #[serde(deserialize_with = "null_as_default")]
    pub artists: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub instrumentalists: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub raagas: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub instruments: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub taals: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub songs: Vec<RawSong>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSong {
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub album: String,
    pub artists: Option<Vec<String>>,
    pub raaga: Option<String>,
    pub taal: Option<String>,
    pub time: Option<String>,
    pub url: Option<String>,
    pub instrument: Option<String>,
    pub duration: u64,
    pub is_fusion: bool,
    pub is_instrumental: bool,
    pub is_filmi: bool,
    pub is_jugalbandi: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Known names declared by the source document, in declaration order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Vocabulary {
    pub artists: Vec<String>,
    pub instrumentalists: Vec<String>,
    pub raagas: Vec<String>,
    pub instruments: Vec<String>,
    pub taals: Vec<String>,
}

impl Vocabulary {
    pub fn from_song_data(data: &SongData) -> Self {
        Self {
            artists: data.artists.clone(),
            instrumentalists: data.instrumentalists.clone(),
            raagas: data.raagas.clone(),
            instruments: data.instruments.clone(),
            taals: data.taals.clone(),
        }
    }
}

/// Display art attached to a track after the catalog is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackArt {
    pub full: Bytes,
    pub thumbnail: Bytes,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub album: String,
    pub genre: String,
    pub taal: Option<String>,
    pub duration_ms: u64,
    pub artists: Vec<String>,
    pub artist: String,
    pub instrument: Option<String>,
    pub time: Option<TimeBucket>,
    pub is_fusion: bool,
    pub is_instrumental: bool,
    pub is_filmi: bool,
    pub is_jugalbandi: bool,
    pub source_url: String,
    #[serde(skip)]
    pub art: Option<TrackArt>,
}

impl Track {
    pub fn in_bucket(&self, bucket: TimeBucket) -> bool {
        self.time == Some(bucket)
    }

    /// Fusion pieces count as instrumental.
    pub fn is_instrumental_or_fusion(&self) -> bool {
        self.is_instrumental || self.is_fusion
    }

    pub fn has_artist(&self, name: &str) -> bool {
        self.artists.iter().any(|artist| artist == name)
    }
}

/// One of the eight three-hour windows of the day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeBucket {
    #[serde(rename = "24-03")]
    Night,
    #[serde(rename = "03-06")]
    Dawn,
    #[serde(rename = "06-09")]
    Morning,
    #[serde(rename = "09-12")]
    LateMorning,
    #[serde(rename = "12-15")]
    Afternoon,
    #[serde(rename = "15-18")]
    LateAfternoon,
    #[serde(rename = "18-21")]
    Evening,
    #[serde(rename = "21-24")]
    LateEvening,
}

impl TimeBucket {
    pub const ALL: [TimeBucket; 8] = [
        TimeBucket::Night,
        TimeBucket::Dawn,
        TimeBucket::Morning,
        TimeBucket::LateMorning,
        TimeBucket::Afternoon,
        TimeBucket::LateAfternoon,
        TimeBucket::Evening,
        TimeBucket::LateEvening,
    ];

    pub fn code(self) -> &'static str {
        match self {
            TimeBucket::Night => "24-03",
            TimeBucket::Dawn => "03-06",
            TimeBucket::Morning => "06-09",
            TimeBucket::LateMorning => "09-12",
            TimeBucket::Afternoon => "12-15",
            TimeBucket::LateAfternoon => "15-18",
            TimeBucket::Evening => "18-21",
            TimeBucket::LateEvening => "21-24",
        }
    }

    /// Bucket containing `minutes` past midnight; `None` outside `[0, 1440)`.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes >= MINUTES_PER_DAY {
            return None;
        }
        Self::ALL
            .get((minutes / MINUTES_PER_BUCKET) as usize)
            .copied()
    }

    pub fn from_time_of_day(now: OffsetDateTime) -> Self {
        let minutes = u32::from(now.hour()) * 60 + u32::from(now.minute());
        Self::from_minutes(minutes).unwrap_or(TimeBucket::Night)
    }

    /// Bucket for the local wall clock.
    pub fn now() -> Self {
        let now = match OffsetDateTime::now_local() {
            Ok(now) => now,
            Err(err) => {
                debug!("local offset unavailable ({}); using UTC", err);
                OffsetDateTime::now_utc()
            }
        };
        Self::from_time_of_day(now)
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownTimeBucket(pub String);

impl fmt::Display for UnknownTimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown time bucket: {}", self.0)
    }
}

impl std::error::Error for UnknownTimeBucket {}

impl FromStr for TimeBucket {
    type Err = UnknownTimeBucket;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|bucket| bucket.code() == value)
            .ok_or_else(|| UnknownTimeBucket(value.to_string()))
    }
}
