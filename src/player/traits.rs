use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerState {
    Playing,
    Paused,
    Stopped,
}

/// What the server is playing right now (used by `status`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackInfo {
    pub name: String,
    pub artist: String,
    pub album: String,
    pub duration_ms: u64,
    pub position_ms: u64,
    pub state: PlayerState,
    pub file_path: Option<String>,
    /// Current Volume (0-100)
    pub volume: Option<u32>,
}

/// Kind of library object a search hit points at 🔎
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    Song,
    Album,
    Artist,
    AlbumArtist,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryType::Song => "Song",
            EntryType::Album => "Album",
            EntryType::Artist => "Artist",
            EntryType::AlbumArtist => "Album Artist",
        };
        f.write_str(name)
    }
}

/// A single search hit. The correlation ids are handed back to `lookup`
/// to resolve concrete songs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub label: String,
    pub description: String,
    pub entry_type: EntryType,
    pub correlation_ids: Vec<String>,
}

/// A playable item, ready to be queued 🎵
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LookupEntry {
    pub path: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub track: Option<u32>,
}

impl LookupEntry {
    /// Entry that only knows its location (free-text queue building, local files, URLs)
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Title, falling back to the last path component
    pub fn display_title(&self) -> String {
        match self.title.as_ref().filter(|t| !t.trim().is_empty()) {
            Some(title) => title.clone(),
            None => self
                .path
                .rsplit('/')
                .find(|part| !part.is_empty())
                .unwrap_or(&self.path)
                .to_string(),
        }
    }
}

/// Library update progress, reported while `sync` runs
#[derive(Debug, Clone, PartialEq)]
pub enum SyncProgress {
    Started { job: u32 },
    Running { job: u32, elapsed: Duration },
    Finished { songs: u32 },
}

/// The remote music service the shell drives 🎵
pub trait RemotePlayer: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<SearchResult>>;
    fn lookup(&self, entry_type: EntryType, ids: &[String]) -> Result<Vec<LookupEntry>>;

    fn add_to_queue(&self, paths: &[String]) -> Result<()>;
    fn set_queue(&self, paths: &[String]) -> Result<()>;

    fn add_folder(&self, path: &Path) -> Result<()>;
    fn set_mount(&self, path: &Path) -> Result<()>;
    fn get_all_folders(&self) -> Result<Vec<String>>;
    fn sync(&self, progress: &mut dyn FnMut(SyncProgress)) -> Result<()>;

    fn pause(&self) -> Result<()>;
    fn resume(&self) -> Result<()>;
    fn stop(&self) -> Result<()>;
    fn next(&self) -> Result<()>;
    fn prev(&self) -> Result<()>;
    fn seek(&self, position: Duration) -> Result<()>;
    /// `fraction` is in `0.0..=1.0`
    fn set_volume(&self, fraction: f32) -> Result<()>;

    fn get_current_track(&self) -> Result<Option<TrackInfo>> {
        Ok(None)
    }
}
