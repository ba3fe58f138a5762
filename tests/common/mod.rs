#![allow(dead_code)]

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vyomsh::player::{
    EntryType, LookupEntry, RemotePlayer, SearchResult, SyncProgress, TrackInfo,
};
use vyomsh::session::Session;

/// Every call the shell made, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Search(String),
    Lookup(EntryType, Vec<String>),
    AddToQueue(Vec<String>),
    SetQueue(Vec<String>),
    AddFolder(String),
    SetMount(String),
    Seek(Duration),
    SetVolume(f32),
    Other(&'static str),
}

/// In-memory stand-in for the music server
#[derive(Default)]
pub struct FakeRemote {
    searches: HashMap<String, Vec<SearchResult>>,
    lookups: HashMap<(EntryType, Vec<String>), Vec<LookupEntry>>,
    calls: Mutex<Vec<Call>>,
    fail_flush: AtomicBool,
    track: Option<TrackInfo>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.searches.insert(query.to_string(), results);
        self
    }

    pub fn with_lookup(mut self, result: &SearchResult, entries: Vec<LookupEntry>) -> Self {
        self.lookups
            .insert((result.entry_type, result.correlation_ids.clone()), entries);
        self
    }

    pub fn with_track(mut self, track: TrackInfo) -> Self {
        self.track = Some(track);
        self
    }

    pub fn set_fail_flush(&self, fail: bool) {
        self.fail_flush.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the queue-changing calls
    pub fn flushes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::AddToQueue(_) | Call::SetQueue(_)))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn flush(&self, call: Call) -> Result<()> {
        self.record(call);
        if self.fail_flush.load(Ordering::SeqCst) {
            return Err(anyhow!("connection refused"));
        }
        Ok(())
    }
}

impl RemotePlayer for FakeRemote {
    fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.record(Call::Search(query.to_string()));
        Ok(self.searches.get(query).cloned().unwrap_or_default())
    }

    fn lookup(&self, entry_type: EntryType, ids: &[String]) -> Result<Vec<LookupEntry>> {
        self.record(Call::Lookup(entry_type, ids.to_vec()));
        Ok(self
            .lookups
            .get(&(entry_type, ids.to_vec()))
            .cloned()
            .unwrap_or_default())
    }

    fn add_to_queue(&self, paths: &[String]) -> Result<()> {
        self.flush(Call::AddToQueue(paths.to_vec()))
    }

    fn set_queue(&self, paths: &[String]) -> Result<()> {
        self.flush(Call::SetQueue(paths.to_vec()))
    }

    fn add_folder(&self, path: &Path) -> Result<()> {
        self.record(Call::AddFolder(path.to_string_lossy().to_string()));
        Ok(())
    }

    fn set_mount(&self, path: &Path) -> Result<()> {
        self.record(Call::SetMount(path.to_string_lossy().to_string()));
        Ok(())
    }

    fn get_all_folders(&self) -> Result<Vec<String>> {
        self.record(Call::Other("get_all_folders"));
        Ok(vec!["/music".to_string()])
    }

    fn sync(&self, progress: &mut dyn FnMut(SyncProgress)) -> Result<()> {
        self.record(Call::Other("sync"));
        progress(SyncProgress::Started { job: 1 });
        progress(SyncProgress::Finished { songs: 42 });
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        self.record(Call::Other("pause"));
        Ok(())
    }

    fn resume(&self) -> Result<()> {
        self.record(Call::Other("resume"));
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.record(Call::Other("stop"));
        Ok(())
    }

    fn next(&self) -> Result<()> {
        self.record(Call::Other("next"));
        Ok(())
    }

    fn prev(&self) -> Result<()> {
        self.record(Call::Other("prev"));
        Ok(())
    }

    fn seek(&self, position: Duration) -> Result<()> {
        self.record(Call::Seek(position));
        Ok(())
    }

    fn set_volume(&self, fraction: f32) -> Result<()> {
        self.record(Call::SetVolume(fraction));
        Ok(())
    }

    fn get_current_track(&self) -> Result<Option<TrackInfo>> {
        self.record(Call::Other("get_current_track"));
        Ok(self.track.clone())
    }
}

pub fn hit(label: &str, entry_type: EntryType, ids: &[&str]) -> SearchResult {
    SearchResult {
        label: label.to_string(),
        description: format!("{} result", entry_type),
        entry_type,
        correlation_ids: ids.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn song(path: &str, title: &str, album: Option<&str>, track: Option<u32>) -> LookupEntry {
    LookupEntry {
        path: path.to_string(),
        title: Some(title.to_string()),
        artist: Some("Test Artist".to_string()),
        album: album.map(str::to_string),
        track,
    }
}

/// Session with buffered messages, plus a handle on the fake
pub fn session(remote: FakeRemote) -> (Session, Arc<FakeRemote>) {
    let remote = Arc::new(remote);
    let session = Session::new(remote.clone());
    (session, remote)
}

pub fn message_texts(session: &mut Session) -> Vec<String> {
    session.take_messages().into_iter().map(|m| m.text).collect()
}
