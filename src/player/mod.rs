#[cfg(feature = "mpd")]
pub mod mpd;
pub mod traits;

#[cfg(feature = "mpd")]
pub use self::mpd::MpdPlayer;
pub use traits::{
    EntryType, LookupEntry, PlayerState, RemotePlayer, SearchResult, SyncProgress, TrackInfo,
};

use crate::app::config::{PersistentState, UserConfig};
use std::sync::Arc;

/// Factory to get the remote player for the current build
#[cfg(feature = "mpd")]
pub fn get_player(config: &UserConfig, state: &PersistentState) -> Arc<dyn RemotePlayer> {
    let music_directory = state
        .mount
        .clone()
        .unwrap_or_else(|| config.music_directory.clone());
    Arc::new(MpdPlayer::new(
        config.host.clone(),
        config.port,
        music_directory,
        config.search_limit,
    ))
}

#[cfg(not(feature = "mpd"))]
pub fn get_player(_config: &UserConfig, _state: &PersistentState) -> Arc<dyn RemotePlayer> {
    Arc::new(OfflinePlayer)
}

/// Placeholder backend for builds without MPD support; every call fails.
#[cfg(not(feature = "mpd"))]
pub struct OfflinePlayer;

#[cfg(not(feature = "mpd"))]
impl OfflinePlayer {
    fn unavailable<T>() -> anyhow::Result<T> {
        Err(anyhow::anyhow!("vyomsh was built without MPD support"))
    }
}

#[cfg(not(feature = "mpd"))]
impl RemotePlayer for OfflinePlayer {
    fn search(&self, _query: &str) -> anyhow::Result<Vec<SearchResult>> { Self::unavailable() }
    fn lookup(&self, _t: EntryType, _ids: &[String]) -> anyhow::Result<Vec<LookupEntry>> { Self::unavailable() }
    fn add_to_queue(&self, _paths: &[String]) -> anyhow::Result<()> { Self::unavailable() }
    fn set_queue(&self, _paths: &[String]) -> anyhow::Result<()> { Self::unavailable() }
    fn add_folder(&self, _path: &std::path::Path) -> anyhow::Result<()> { Self::unavailable() }
    fn set_mount(&self, _path: &std::path::Path) -> anyhow::Result<()> { Self::unavailable() }
    fn get_all_folders(&self) -> anyhow::Result<Vec<String>> { Self::unavailable() }
    fn sync(&self, _progress: &mut dyn FnMut(SyncProgress)) -> anyhow::Result<()> { Self::unavailable() }
    fn pause(&self) -> anyhow::Result<()> { Self::unavailable() }
    fn resume(&self) -> anyhow::Result<()> { Self::unavailable() }
    fn stop(&self) -> anyhow::Result<()> { Self::unavailable() }
    fn next(&self) -> anyhow::Result<()> { Self::unavailable() }
    fn prev(&self) -> anyhow::Result<()> { Self::unavailable() }
    fn seek(&self, _position: std::time::Duration) -> anyhow::Result<()> { Self::unavailable() }
    fn set_volume(&self, _fraction: f32) -> anyhow::Result<()> { Self::unavailable() }
}
