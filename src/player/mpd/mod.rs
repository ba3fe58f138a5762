use super::traits::{
    EntryType, LookupEntry, PlayerState, RemotePlayer, SearchResult, SyncProgress, TrackInfo,
};
use anyhow::{Context, Result};
use mpd::{Client, Query, Song, State, Term};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// How often `sync` polls the server while the database update runs
const SYNC_POLL: Duration = Duration::from_millis(500);

/// MPD implementation of the remote service
pub struct MpdPlayer {
    host: String,
    port: u16,
    search_limit: u32,
    /// Local directory that maps onto the library root
    music_directory: Mutex<String>,
    client: Mutex<Option<Client>>,
}

impl MpdPlayer {
    pub fn new(host: String, port: u16, music_directory: String, search_limit: u32) -> Self {
        Self {
            host,
            port,
            search_limit,
            music_directory: Mutex::new(music_directory),
            client: Mutex::new(None),
        }
    }

    /// Get a mutable reference to the MPD client, reconnecting if necessary.
    /// The same connection is reused across requests as long as it answers.
    fn with_client<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut mpd::Client) -> Result<T>,
    {
        // 1. Lock the mutex 🔒
        let mut client_guard = self
            .client
            .lock()
            .map_err(|_| anyhow::anyhow!("MPD client mutex poisoned"))?;

        // 2. Check connection status
        let needs_connect = match client_guard.as_mut() {
            Some(client) => client.status().is_err(),
            None => true,
        };

        // 3. Reconnect if needed
        if needs_connect {
            let addr = format!("{}:{}", self.host, self.port);
            match mpd::Client::connect(&addr) {
                Ok(c) => {
                    tracing::info!(%addr, "connected to MPD");
                    *client_guard = Some(c);
                }
                Err(e) => {
                    *client_guard = None;
                    return Err(anyhow::anyhow!(
                        "Failed to connect to MPD at {}: {}",
                        addr,
                        e
                    ));
                }
            }
        }

        // 4. Use the client
        match client_guard.as_mut() {
            Some(client) => f(client),
            None => Err(anyhow::anyhow!("No MPD connection")),
        }
    }

    fn music_directory(&self) -> String {
        self.music_directory
            .lock()
            .map(|dir| dir.clone())
            .unwrap_or_default()
    }

    fn push_all(client: &mut Client, uris: &[String]) -> Result<()> {
        for uri in uris {
            client
                .push(Song {
                    file: uri.clone(),
                    ..Default::default()
                })
                .with_context(|| format!("Failed to queue {}", uri))?;
        }
        Ok(())
    }

    fn uris(&self, paths: &[String]) -> Vec<String> {
        let music_dir = self.music_directory();
        paths
            .iter()
            .map(|path| library_uri(&music_dir, path))
            .collect()
    }
}

impl RemotePlayer for MpdPlayer {
    fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let limit = self.search_limit;
        let songs = self.with_client(|client| {
            client
                .search(Query::new().and(Term::Any, query), (0, limit))
                .context("Search failed")
        })?;
        tracing::debug!(query, hits = songs.len(), "library search");
        Ok(group_results(&songs, query))
    }

    fn lookup(&self, entry_type: EntryType, ids: &[String]) -> Result<Vec<LookupEntry>> {
        let songs = self.with_client(|client| {
            let mut songs = Vec::new();
            match entry_type {
                EntryType::Song => {
                    for id in ids {
                        songs.extend(client.find(Query::new().and(Term::File, id.as_str()), (0, 1))?);
                    }
                }
                EntryType::Artist | EntryType::AlbumArtist => {
                    let tag = if entry_type == EntryType::Artist {
                        "Artist"
                    } else {
                        "AlbumArtist"
                    };
                    for id in ids {
                        songs.extend(client.find(
                            Query::new().and(Term::Tag(tag.into()), id.as_str()),
                            (0, u32::MAX),
                        )?);
                    }
                }
                EntryType::Album => {
                    if let Some(album) = ids.first() {
                        let mut query = Query::new();
                        query.and(Term::Tag("Album".into()), album.as_str());
                        if let Some(album_artist) = ids.get(1) {
                            query.and(Term::Tag("AlbumArtist".into()), album_artist.as_str());
                        }
                        songs.extend(client.find(&query, (0, u32::MAX))?);
                    }
                }
            }
            Ok(songs)
        })?;

        let mut entries: Vec<LookupEntry> = songs.iter().map(lookup_entry).collect();
        entries.sort_by(|a, b| {
            a.album
                .cmp(&b.album)
                .then(a.track.cmp(&b.track))
                .then(a.path.cmp(&b.path))
        });
        entries.dedup_by(|a, b| a.path == b.path);
        tracing::debug!(%entry_type, found = entries.len(), "lookup");
        Ok(entries)
    }

    fn add_to_queue(&self, paths: &[String]) -> Result<()> {
        let uris = self.uris(paths);
        tracing::info!(count = uris.len(), "appending to queue");
        self.with_client(|client| Self::push_all(client, &uris))
    }

    fn set_queue(&self, paths: &[String]) -> Result<()> {
        let uris = self.uris(paths);
        tracing::info!(count = uris.len(), "replacing queue");
        self.with_client(|client| {
            client.clear().context("Failed to clear queue")?;
            Self::push_all(client, &uris)?;
            client.play().context("Failed to start playback")
        })
    }

    fn add_folder(&self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .context("Folder has no name")?;
        let uri = format!("file://{}", path.display());
        tracing::info!(%name, %uri, "mounting folder");
        self.with_client(|client| {
            client
                .mount(&name, &uri)
                .with_context(|| format!("Failed to mount {}", uri))
        })
    }

    fn set_mount(&self, path: &Path) -> Result<()> {
        let mut dir = self
            .music_directory
            .lock()
            .map_err(|_| anyhow::anyhow!("music directory mutex poisoned"))?;
        *dir = path.to_string_lossy().to_string();
        tracing::info!(mount = %dir, "library mount changed");
        Ok(())
    }

    fn get_all_folders(&self) -> Result<Vec<String>> {
        let mut folders = vec![self.music_directory()];
        let mounts = self.with_client(|client| client.mounts().context("Failed to list mounts"))?;
        folders.extend(
            mounts
                .into_iter()
                .filter(|m| !m.storage.is_empty())
                .map(|m| {
                    m.storage
                        .strip_prefix("file://")
                        .map(str::to_string)
                        .unwrap_or(m.storage)
                }),
        );
        folders.dedup();
        Ok(folders)
    }

    fn sync(&self, progress: &mut dyn FnMut(SyncProgress)) -> Result<()> {
        let job = self.with_client(|client| client.update().context("Failed to start update"))?;
        progress(SyncProgress::Started { job });

        let started = Instant::now();
        loop {
            std::thread::sleep(SYNC_POLL);
            let updating = self.with_client(|client| Ok(client.status()?.updating_db))?;
            if updating.is_none() {
                break;
            }
            progress(SyncProgress::Running {
                job,
                elapsed: started.elapsed(),
            });
        }

        let songs = self.with_client(|client| Ok(client.stats()?.songs))?;
        progress(SyncProgress::Finished { songs });
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        self.with_client(|client| client.pause(true).context("Failed to pause"))
    }

    fn resume(&self) -> Result<()> {
        self.with_client(|client| {
            let status = client.status()?;
            match status.state {
                State::Pause => client.pause(false)?,
                State::Stop => client.play()?,
                State::Play => {}
            };
            Ok(())
        })
    }

    fn stop(&self) -> Result<()> {
        self.with_client(|client| client.stop().context("Failed to stop"))
    }

    fn next(&self) -> Result<()> {
        self.with_client(|client| client.next().context("Failed to skip to next track"))
    }

    fn prev(&self) -> Result<()> {
        self.with_client(|client| client.prev().context("Failed to skip to previous track"))
    }

    fn seek(&self, position: Duration) -> Result<()> {
        self.with_client(|client| {
            let song = client.currentsong()?.context("No song playing")?;
            let place = song.place.context("No song place")?;
            client
                .seek(place.id, position.as_secs_f64())
                .context("Failed to seek")
        })
    }

    fn set_volume(&self, fraction: f32) -> Result<()> {
        let percent = (fraction.clamp(0.0, 1.0) * 100.0).round() as i8;
        self.with_client(|client| client.volume(percent).context("Failed to set volume"))
    }

    fn get_current_track(&self) -> Result<Option<TrackInfo>> {
        self.with_client(|client| {
            let current_song = client.currentsong().ok().flatten();
            let status = client.status()?;

            let Some(song) = current_song else {
                return Ok(None);
            };

            let to_ms = |d: Duration| d.as_secs() * 1000 + d.subsec_millis() as u64;
            Ok(Some(TrackInfo {
                name: song.title.clone().unwrap_or_else(|| "Unknown".to_string()),
                artist: song.artist.clone().unwrap_or_else(|| "Unknown".to_string()),
                album: find_tag(&song.tags, "Album").unwrap_or_else(|| "Unknown".to_string()),
                duration_ms: status.duration.map(to_ms).unwrap_or(0),
                position_ms: status.elapsed.map(to_ms).unwrap_or(0),
                state: match status.state {
                    State::Play => PlayerState::Playing,
                    State::Pause => PlayerState::Paused,
                    State::Stop => PlayerState::Stopped,
                },
                file_path: Some(song.file),
                volume: Some(status.volume.unsigned_abs() as u32),
            }))
        })
    }
}

/// Helper to find tag (case-insensitive)
fn find_tag(tags: &[(String, String)], key: &str) -> Option<String> {
    let key_lower = key.to_lowercase();
    tags.iter()
        .find(|(k, _)| k.to_lowercase() == key_lower)
        .map(|(_, v)| v.clone())
}

fn song_artist(song: &Song) -> Option<String> {
    song.artist
        .clone()
        .or_else(|| find_tag(&song.tags, "Artist"))
}

fn lookup_entry(song: &Song) -> LookupEntry {
    LookupEntry {
        path: song.file.clone(),
        title: song.title.clone().or_else(|| find_tag(&song.tags, "Title")),
        artist: song_artist(song),
        album: find_tag(&song.tags, "Album"),
        // "3/12" style track numbers
        track: find_tag(&song.tags, "Track")
            .and_then(|t| t.split('/').next().and_then(|n| n.trim().parse().ok())),
    }
}

/// Turn a flat list of matching songs into artist, album artist, album and
/// song hits, in that order.
fn group_results(songs: &[Song], query: &str) -> Vec<SearchResult> {
    let needle = query.to_lowercase();
    let matches = |value: &str| value.to_lowercase().contains(&needle);

    let mut seen: HashSet<(EntryType, Vec<String>)> = HashSet::new();
    let mut artists = Vec::new();
    let mut album_artists = Vec::new();
    let mut albums = Vec::new();
    let mut tracks = Vec::new();

    let mut push = |bucket: &mut Vec<SearchResult>, result: SearchResult| {
        if seen.insert((result.entry_type, result.correlation_ids.clone())) {
            bucket.push(result);
        }
    };

    for song in songs {
        let artist = song_artist(song);
        let album_artist = find_tag(&song.tags, "AlbumArtist");
        let album = find_tag(&song.tags, "Album");

        if let Some(artist) = artist.as_ref().filter(|a| matches(a)) {
            push(
                &mut artists,
                SearchResult {
                    label: artist.clone(),
                    description: EntryType::Artist.to_string(),
                    entry_type: EntryType::Artist,
                    correlation_ids: vec![artist.clone()],
                },
            );
        }

        if let Some(album_artist) = album_artist.as_ref().filter(|a| matches(a)) {
            push(
                &mut album_artists,
                SearchResult {
                    label: album_artist.clone(),
                    description: EntryType::AlbumArtist.to_string(),
                    entry_type: EntryType::AlbumArtist,
                    correlation_ids: vec![album_artist.clone()],
                },
            );
        }

        if let Some(album) = album.as_ref().filter(|a| matches(a)) {
            let mut ids = vec![album.clone()];
            let by = album_artist.clone().or_else(|| artist.clone());
            if let Some(album_artist) = album_artist.as_ref() {
                ids.push(album_artist.clone());
            }
            push(
                &mut albums,
                SearchResult {
                    label: album.clone(),
                    description: match by {
                        Some(by) => format!("Album by {}", by),
                        None => EntryType::Album.to_string(),
                    },
                    entry_type: EntryType::Album,
                    correlation_ids: ids,
                },
            );
        }

        let title = song.title.clone().or_else(|| find_tag(&song.tags, "Title"));
        let title_hit = title.as_deref().map(matches).unwrap_or(false);
        if title_hit || matches(&song.file) {
            let label = title.unwrap_or_else(|| lookup_entry(song).display_title());
            let description = match (artist.as_ref(), album.as_ref()) {
                (Some(artist), Some(album)) => format!("Song by {} on {}", artist, album),
                (Some(artist), None) => format!("Song by {}", artist),
                _ => EntryType::Song.to_string(),
            };
            push(
                &mut tracks,
                SearchResult {
                    label,
                    description,
                    entry_type: EntryType::Song,
                    correlation_ids: vec![song.file.clone()],
                },
            );
        }
    }

    artists
        .into_iter()
        .chain(album_artists)
        .chain(albums)
        .chain(tracks)
        .collect()
}

/// Map a path from the shell onto something MPD can queue: library-relative
/// when it lives under the mount, `file://` for other local files, URLs as is.
pub fn library_uri(music_directory: &str, path: &str) -> String {
    if path.contains("://") {
        return path.to_string();
    }
    let local = Path::new(path);
    if !local.is_absolute() {
        return path.to_string();
    }
    if !music_directory.is_empty() {
        if let Ok(relative) = local.strip_prefix(music_directory) {
            return relative.to_string_lossy().to_string();
        }
    }
    format!("file://{}", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(file: &str, title: &str, tags: &[(&str, &str)]) -> Song {
        Song {
            file: file.to_string(),
            title: Some(title.to_string()),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_library_uri() {
        assert_eq!(library_uri("/music", "/music/a/b.flac"), "a/b.flac");
        assert_eq!(library_uri("/music", "/tmp/b.flac"), "file:///tmp/b.flac");
        assert_eq!(library_uri("/music", "a/b.flac"), "a/b.flac");
        assert_eq!(
            library_uri("/music", "https://radio.example/stream"),
            "https://radio.example/stream"
        );
    }

    #[test]
    fn test_group_results_orders_and_dedups() {
        let songs = vec![
            song(
                "Floyd/Animals/01 Dogs.flac",
                "Dogs",
                &[("Artist", "Pink Floyd"), ("Album", "Animals"), ("AlbumArtist", "Pink Floyd")],
            ),
            song(
                "Floyd/Animals/02 Pigs.flac",
                "Pigs",
                &[("Artist", "Pink Floyd"), ("Album", "Animals"), ("AlbumArtist", "Pink Floyd")],
            ),
        ];

        let results = group_results(&songs, "floyd");
        let types: Vec<EntryType> = results.iter().map(|r| r.entry_type).collect();
        // Titles don't match but the file paths do
        assert_eq!(
            types,
            vec![EntryType::Artist, EntryType::AlbumArtist, EntryType::Song, EntryType::Song]
        );

        let results = group_results(&songs, "animals");
        assert_eq!(results[0].entry_type, EntryType::Album);
        assert_eq!(results[0].correlation_ids, vec!["Animals", "Pink Floyd"]);
        assert_eq!(results[0].description, "Album by Pink Floyd");
    }

    #[test]
    fn test_lookup_entry_parses_track_number() {
        let entry = lookup_entry(&song("a.flac", "A", &[("Track", "3/12"), ("Album", "X")]));
        assert_eq!(entry.track, Some(3));
        assert_eq!(entry.album.as_deref(), Some("X"));
    }
}
