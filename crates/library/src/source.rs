//! Song sources and the remote/local toggle consulted while building tracks.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use common::SongData;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("http error: {0}")]
    Http(String),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Http(err.to_string())
    }
}

/// Produces one batch of raw song records. Called from the blocking pool.
pub trait SongSource: Send + Sync {
    fn describe(&self) -> String;
    fn load(&self) -> Result<SongData, SourceError>;
}

/// Reads the remote/local playback toggle owned by an external settings store.
pub trait SourceToggle: Send + Sync {
    fn is_remote(&self) -> bool;
}

#[derive(Debug, Default)]
pub struct FixedToggle(AtomicBool);

impl FixedToggle {
    pub fn new(remote: bool) -> Self {
        Self(AtomicBool::new(remote))
    }

    pub fn set_remote(&self, remote: bool) {
        self.0.store(remote, Ordering::Relaxed);
    }
}

impl SourceToggle for FixedToggle {
    fn is_remote(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SongSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn load(&self) -> Result<SongData, SourceError> {
        let contents = fs::read_to_string(&self.path)?;
        let data = serde_json::from_str(&contents)?;
        Ok(data)
    }
}

pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl SongSource for HttpSource {
    fn describe(&self) -> String {
        format!("url {}", self.url)
    }

    fn load(&self) -> Result<SongData, SourceError> {
        // The blocking client owns a runtime; build it here, off the async workers.
        let client = reqwest::blocking::Client::builder()
            .user_agent("raga-catalog/0.1")
            .timeout(self.timeout)
            .build()?;
        let response = client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http(format!("{} returned {}", self.url, status)));
        }
        let body = response.text()?;
        debug!("fetched {} bytes from {}", body.len(), self.url);
        Ok(serde_json::from_str(&body)?)
    }
}

/// A document held in memory, e.g. bundled with the binary.
pub struct StaticSource {
    json: String,
}

impl StaticSource {
    pub fn from_json(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }

    pub fn from_data(data: &SongData) -> Result<Self, SourceError> {
        Ok(Self {
            json: serde_json::to_string(data)?,
        })
    }
}

impl SongSource for StaticSource {
    fn describe(&self) -> String {
        "embedded document".to_string()
    }

    fn load(&self) -> Result<SongData, SourceError> {
        Ok(serde_json::from_str(&self.json)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{FileSource, FixedToggle, SongSource, SourceError, SourceToggle, StaticSource};

    #[test]
    fn file_source_reads_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"songs":[{{"id":"a","title":"Yaman"}}]}}"#).unwrap();
        let data = FileSource::new(file.path()).load().unwrap();
        assert_eq!(data.songs.len(), 1);
        assert_eq!(data.songs[0].title, "Yaman");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::new(dir.path().join("songs.json"))
            .load()
            .unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[test]
    fn garbage_is_parse_error() {
        let err = StaticSource::from_json("{not json").load().unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn toggle_flips() {
        let toggle = FixedToggle::new(false);
        assert!(!toggle.is_remote());
        toggle.set_remote(true);
        assert!(toggle.is_remote());
    }
}
