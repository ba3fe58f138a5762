use super::engine::Session;
use super::mode::Mode;
use super::suggestion::{album_from_label, album_key, Payload};
use crate::error::ShellError;
use crate::player::{EntryType, LookupEntry, SearchResult};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Candidates kept around while a browse sub-mode is open
#[derive(Debug, Default, Clone)]
pub struct BrowseState {
    /// Hits shown in ResultBrowse
    pub results: Vec<SearchResult>,
    /// Looked-up songs of an artist, shown by album in AlbumBrowse
    pub lookup: Vec<LookupEntry>,
    /// Songs shown in SongBrowse
    pub songs: Vec<LookupEntry>,
}

/// Where a resolution ended up
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// This many entries went into the accumulator
    Queued(usize),
    NoResults,
    /// A browse sub-mode was opened; the user picks next
    Browsing(Mode),
    Cancelled,
}

pub fn is_url(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        if path == "~" {
            return home;
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).with_context(|| format!("cannot resolve {}", path.display()))
}

impl Session {
    /// Turn free text (or a picked suggestion) into queue entries.
    ///
    /// Local files win over everything, then URLs, then the picked
    /// suggestion, and finally a remote search.
    pub fn resolve(&mut self, query: &str, selected: Option<Payload>) -> Result<Resolution> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ShellError::MissingArgument("query").into());
        }

        // 1. Existing local file
        let local = expand_home(query);
        if local.exists() {
            let absolute = absolute_path(&local)?;
            return self.queue_local_file(&absolute);
        }

        // 2. URL, passed through untouched
        if is_url(query) {
            self.queue.push(LookupEntry::from_path(query));
            self.modes.reset();
            return Ok(Resolution::Queued(1));
        }

        // 3. Search unless the user already picked something
        let payload = match selected {
            Some(payload) => payload,
            None => {
                let mut results = self.remote.search(query)?;
                match results.len() {
                    0 => {
                        self.info(format!("no results for \"{}\"", query));
                        return Ok(Resolution::NoResults);
                    }
                    1 => Payload::Search(results.remove(0)),
                    count => {
                        tracing::debug!(query, count, "ambiguous search");
                        self.browse.results = results;
                        self.modes.push(Mode::ResultBrowse);
                        self.info(format!("{} results for \"{}\", pick one (Tab lists them)", count, query));
                        return Ok(Resolution::Browsing(Mode::ResultBrowse));
                    }
                }
            }
        };

        self.apply_payload(payload)
    }

    /// Act on a picked payload
    pub fn apply_payload(&mut self, payload: Payload) -> Result<Resolution> {
        match payload {
            Payload::Search(result) => self.resolve_result(&result),
            Payload::Path(path) => {
                let local = expand_home(&path);
                let path = if local.exists() {
                    absolute_path(&local)?.to_string_lossy().to_string()
                } else {
                    path
                };
                Ok(self.accumulate(vec![LookupEntry::from_path(path)]))
            }
            Payload::Entry(entry) => Ok(self.accumulate(vec![entry])),
            Payload::SelectAll(entries) => Ok(self.accumulate(entries)),
            Payload::Back => {
                self.modes.reset();
                Ok(Resolution::Cancelled)
            }
        }
    }

    fn resolve_result(&mut self, result: &SearchResult) -> Result<Resolution> {
        let entries = self
            .remote
            .lookup(result.entry_type, &result.correlation_ids)
            .with_context(|| format!("lookup of \"{}\" failed", result.label))?;
        tracing::debug!(label = %result.label, entry_type = %result.entry_type, found = entries.len(), "resolved search result");
        if entries.is_empty() {
            self.info(format!("no songs found for \"{}\"", result.label));
        }

        match result.entry_type {
            EntryType::Song => Ok(self.accumulate(entries)),
            EntryType::Artist | EntryType::AlbumArtist => {
                self.browse.lookup = entries;
                self.modes.push(Mode::AlbumBrowse);
                Ok(Resolution::Browsing(Mode::AlbumBrowse))
            }
            EntryType::Album => {
                self.browse.songs = entries;
                self.modes.push(Mode::SongBrowse);
                Ok(Resolution::Browsing(Mode::SongBrowse))
            }
        }
    }

    /// Narrow the artist's songs to one album and open SongBrowse.
    /// `(untitled)` selects songs without an album tag.
    pub fn open_album(&mut self, label: &str) -> Result<Resolution> {
        let album = album_from_label(label);
        let songs: Vec<LookupEntry> = self
            .browse
            .lookup
            .iter()
            .filter(|e| album_key(e) == album)
            .cloned()
            .collect();

        if songs.is_empty() {
            self.info(format!("no album \"{}\"", label));
            return Ok(Resolution::NoResults);
        }
        self.browse.songs = songs;
        self.modes.push(Mode::SongBrowse);
        Ok(Resolution::Browsing(Mode::SongBrowse))
    }

    fn queue_local_file(&mut self, path: &Path) -> Result<Resolution> {
        if path.is_dir() {
            return Err(ShellError::IsADirectory(path.to_path_buf()).into());
        }
        let entry = LookupEntry::from_path(path.to_string_lossy().to_string());
        Ok(self.accumulate(vec![entry]))
    }

    fn accumulate(&mut self, entries: Vec<LookupEntry>) -> Resolution {
        let count = entries.len();
        self.queue.extend(entries);
        self.modes.reset();
        Resolution::Queued(count)
    }
}
