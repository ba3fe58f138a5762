mod common;

use common::{hit, message_texts, session, song, Call, FakeRemote};
use std::fs::{self, File};
use std::sync::Arc;
use std::time::Duration;
use vyomsh::app::config::{AppConfig, PersistentState};
use vyomsh::player::{EntryType, PlayerState, TrackInfo};
use vyomsh::session::{Mode, QueueOrigin, Session};

/// Two songs matching "test", each resolving to one file
fn two_song_remote() -> FakeRemote {
    let one = hit("Song One", EntryType::Song, &["music/a.mp3"]);
    let two = hit("Song Two", EntryType::Song, &["music/b.mp3"]);
    FakeRemote::new()
        .with_search("test", vec![one.clone(), two.clone()])
        .with_lookup(&one, vec![song("music/a.mp3", "Song One", None, None)])
        .with_lookup(&two, vec![song("music/b.mp3", "Song Two", None, None)])
}

/// An artist with two albums and one untagged song
fn artist_remote() -> FakeRemote {
    let floyd = hit("Pink Floyd", EntryType::Artist, &["Pink Floyd"]);
    FakeRemote::new()
        .with_search("floyd", vec![floyd.clone()])
        .with_lookup(
            &floyd,
            vec![
                song("pf/animals/01.flac", "Pigs on the Wing", Some("Animals"), Some(1)),
                song("pf/animals/02.flac", "Dogs", Some("Animals"), Some(2)),
                song("pf/meddle/01.flac", "One of These Days", Some("Meddle"), Some(1)),
                song("pf/misc/demo.flac", "Demo", None, None),
            ],
        )
}

#[test]
fn test_session_initialization() {
    let (session, _remote) = session(FakeRemote::new());
    assert!(session.is_running());
    assert_eq!(session.mode(), Mode::Root);
    assert_eq!(session.prompt(), "vyom> ");
    assert!(session.pending().is_empty());
    assert_eq!(session.origin(), QueueOrigin::Add);
}

#[test]
fn test_no_results_stays_at_root() {
    let (mut session, remote) = session(FakeRemote::new());

    session.execute("add-queue nothing here", None);

    assert_eq!(session.mode(), Mode::Root);
    assert!(remote.flushes().is_empty());
    assert_eq!(message_texts(&mut session), vec!["no results for \"nothing here\""]);
}

#[test]
fn test_single_result_is_queued_directly() {
    let only = hit("Dogs", EntryType::Song, &["pf/dogs.flac"]);
    let remote = FakeRemote::new()
        .with_search("dogs", vec![only.clone()])
        .with_lookup(&only, vec![song("pf/dogs.flac", "Dogs", None, None)]);
    let (mut session, remote) = session(remote);

    session.execute("add-queue dogs", None);

    assert_eq!(session.mode(), Mode::Root);
    assert_eq!(
        remote.flushes(),
        vec![Call::AddToQueue(vec!["pf/dogs.flac".to_string()])]
    );
}

#[test]
fn test_ambiguous_search_then_pick_second() {
    let (mut session, remote) = session(two_song_remote());

    // 1. Two hits: a browse sub-mode opens
    session.execute("add-queue test", None);
    assert_eq!(session.mode(), Mode::ResultBrowse);
    assert_eq!(session.prompt(), "select> ");
    assert!(remote.flushes().is_empty());

    // 2. The list offers both hits and a way back
    let completion = session.complete("", 80);
    let texts: Vec<&str> = completion.suggestions.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["Song One", "Song Two", "back"]);

    // 3. Picking the second one queues exactly that song, appended
    let picked = completion.suggestions[1].clone();
    session.execute("Song Two", Some(picked));

    assert_eq!(session.mode(), Mode::Root);
    assert_eq!(
        remote.flushes(),
        vec![Call::AddToQueue(vec!["music/b.mp3".to_string()])]
    );
}

#[test]
fn test_typed_suggestion_text_is_recovered() {
    let (mut session, remote) = session(two_song_remote());

    session.execute("add-queue test", None);
    // No Tab pressed, text typed by hand in a different case
    session.execute("song one", None);

    assert_eq!(session.mode(), Mode::Root);
    assert_eq!(
        remote.flushes(),
        vec![Call::AddToQueue(vec!["music/a.mp3".to_string()])]
    );
}

#[test]
fn test_unknown_entry_keeps_browsing() {
    let (mut session, remote) = session(two_song_remote());

    session.execute("add-queue test", None);
    session.take_messages();
    session.execute("Song Three", None);

    assert_eq!(session.mode(), Mode::ResultBrowse);
    assert!(remote.flushes().is_empty());
    assert_eq!(message_texts(&mut session), vec!["no such entry \"Song Three\""]);
}

#[test]
fn test_blank_line_and_back_cancel_browsing() {
    let (mut session, remote) = session(two_song_remote());

    session.execute("add-queue test", None);
    session.execute("", None);
    assert_eq!(session.mode(), Mode::Root);

    session.execute("add-queue test", None);
    session.execute("back", None);
    assert_eq!(session.mode(), Mode::Root);

    assert!(remote.flushes().is_empty());
}

#[test]
fn test_artist_album_song_flow() {
    let (mut session, remote) = session(artist_remote());

    // 1. Single artist hit opens the album list
    session.execute("add-queue floyd", None);
    assert_eq!(session.mode(), Mode::AlbumBrowse);

    let albums = session.complete("", 80);
    let texts: Vec<&str> = albums.suggestions.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["select all", "(untitled)", "Animals", "Meddle", "back"]);

    // 2. Album narrows to its songs
    session.execute("Animals", None);
    assert_eq!(session.mode(), Mode::SongBrowse);
    assert_eq!(session.browse().songs.len(), 2);

    // 3. One song is queued and the session is back at Root
    session.execute("Dogs", None);
    assert_eq!(session.mode(), Mode::Root);
    assert_eq!(
        remote.flushes(),
        vec![Call::AddToQueue(vec!["pf/animals/02.flac".to_string()])]
    );
}

#[test]
fn test_select_all_queues_the_narrowed_set() {
    let (mut session, remote) = session(artist_remote());

    session.execute("add-queue floyd", None);
    session.execute("Animals", None);
    session.execute("select all", None);

    assert_eq!(session.mode(), Mode::Root);
    assert_eq!(
        remote.flushes(),
        vec![Call::AddToQueue(vec![
            "pf/animals/01.flac".to_string(),
            "pf/animals/02.flac".to_string(),
        ])]
    );
}

#[test]
fn test_album_names_sort_case_sensitively() {
    let artist = hit("Mixed Case", EntryType::Artist, &["Mixed Case"]);
    let remote = FakeRemote::new()
        .with_search("mixed", vec![artist.clone()])
        .with_lookup(
            &artist,
            vec![
                song("m/abba/01.flac", "Lower", Some("abba"), Some(1)),
                song("m/zed/01.flac", "Upper", Some("Zed"), Some(1)),
            ],
        );
    let (mut session, _remote) = session(remote);

    session.execute("add-queue mixed", None);
    let albums = session.complete("", 80);
    let texts: Vec<&str> = albums.suggestions.iter().map(|s| s.text.as_str()).collect();

    // Byte order: uppercase before lowercase
    assert_eq!(texts, vec!["select all", "Zed", "abba", "back"]);
}

#[test]
fn test_blank_album_tags_share_one_untitled_entry() {
    let artist = hit("Blank", EntryType::Artist, &["Blank"]);
    let remote = FakeRemote::new()
        .with_search("blank", vec![artist.clone()])
        .with_lookup(
            &artist,
            vec![
                song("b/one.flac", "One", Some("  "), None),
                song("b/two.flac", "Two", Some(""), None),
                song("b/three.flac", "Three", None, None),
            ],
        );
    let (mut session, remote) = session(remote);

    session.execute("add-queue blank", None);
    let albums = session.complete("", 80);
    let texts: Vec<&str> = albums.suggestions.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["select all", "(untitled)", "back"]);

    session.execute("(untitled)", None);
    assert_eq!(session.mode(), Mode::SongBrowse);
    assert_eq!(session.browse().songs.len(), 3);

    session.execute("select all", None);
    assert_eq!(
        remote.flushes(),
        vec![Call::AddToQueue(vec![
            "b/one.flac".to_string(),
            "b/two.flac".to_string(),
            "b/three.flac".to_string(),
        ])]
    );
}

#[test]
fn test_untitled_album_selects_untagged_songs() {
    let (mut session, remote) = session(artist_remote());

    session.execute("add-queue floyd", None);
    session.execute("(untitled)", None);
    assert_eq!(session.mode(), Mode::SongBrowse);
    session.execute("select all", None);

    assert_eq!(
        remote.flushes(),
        vec![Call::AddToQueue(vec!["pf/misc/demo.flac".to_string()])]
    );
}

#[test]
fn test_select_all_on_empty_artist_sends_nothing() {
    let ghost = hit("Ghost", EntryType::Artist, &["Ghost"]);
    let (mut session, remote) = session(FakeRemote::new().with_search("ghost", vec![ghost]));

    session.execute("add-queue ghost", None);
    assert_eq!(session.mode(), Mode::AlbumBrowse);
    session.execute("select all", None);

    assert_eq!(session.mode(), Mode::Root);
    assert!(session.pending().is_empty());
    assert!(remote.flushes().is_empty());
}

#[test]
fn test_failed_flush_is_retried_with_next_entries() {
    let (mut session, remote) = session(two_song_remote());
    remote.set_fail_flush(true);

    session.execute("add-queue test", None);
    session.execute("Song One", None);

    // Kept for later
    assert_eq!(session.mode(), Mode::Root);
    assert_eq!(session.pending().len(), 1);
    let messages = message_texts(&mut session);
    assert!(messages.iter().any(|m| m.contains("connection refused")));

    remote.set_fail_flush(false);
    session.execute("add-queue test", None);
    session.execute("Song Two", None);

    assert!(session.pending().is_empty());
    assert_eq!(
        remote.flushes(),
        vec![
            Call::AddToQueue(vec!["music/a.mp3".to_string()]),
            Call::AddToQueue(vec!["music/a.mp3".to_string(), "music/b.mp3".to_string()]),
        ]
    );
}

#[test]
fn test_set_queue_replaces() {
    let (mut session, remote) = session(two_song_remote());

    session.execute("set-queue test", None);
    assert_eq!(session.origin(), QueueOrigin::Set);
    session.execute("Song Two", None);

    assert_eq!(
        remote.flushes(),
        vec![Call::SetQueue(vec!["music/b.mp3".to_string()])]
    );
    // Next turn appends again
    assert_eq!(session.origin(), QueueOrigin::Add);
}

#[test]
fn test_local_file_skips_search() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("local song.mp3");
    File::create(&file).unwrap();
    let absolute = fs::canonicalize(&file).unwrap().to_string_lossy().to_string();

    let (mut session, remote) = session(FakeRemote::new());
    session.execute(&format!("add-queue {}", file.display()), None);

    assert_eq!(remote.flushes(), vec![Call::AddToQueue(vec![absolute])]);
    assert!(!remote.calls().iter().any(|c| matches!(c, Call::Search(_))));
}

#[test]
fn test_relative_path_matches_absolute_path() {
    // Created under the working directory so it can be named relatively
    let dir = tempfile::tempdir_in(".").unwrap();
    let file = dir.path().join("relative song.flac");
    File::create(&file).unwrap();
    let absolute = fs::canonicalize(&file).unwrap();
    assert!(file.is_relative());

    let (mut by_relative, relative_remote) = session(FakeRemote::new());
    by_relative.execute(&format!("add-queue {}", file.display()), None);

    let (mut by_absolute, absolute_remote) = session(FakeRemote::new());
    by_absolute.execute(&format!("add-queue {}", absolute.display()), None);

    assert_eq!(
        relative_remote.flushes(),
        vec![Call::AddToQueue(vec![absolute.to_string_lossy().to_string()])]
    );
    assert_eq!(relative_remote.flushes(), absolute_remote.flushes());
}

#[test]
fn test_local_directory_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, remote) = session(FakeRemote::new());

    session.execute(&format!("add-queue {}", dir.path().display()), None);

    assert!(remote.calls().is_empty());
    let messages = message_texts(&mut session);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].ends_with("is a directory"));
}

#[test]
fn test_url_is_passed_through() {
    let (mut session, remote) = session(FakeRemote::new());

    session.execute("add-queue https://radio.example/stream.mp3", None);

    assert_eq!(
        remote.calls(),
        vec![Call::AddToQueue(vec!["https://radio.example/stream.mp3".to_string()])]
    );
}

#[test]
fn test_queue_entry_flushes_on_blank_line() {
    let (mut session, remote) = session(FakeRemote::new());

    session.execute("set-queue", None);
    assert_eq!(session.mode(), Mode::QueueEntry);
    assert_eq!(session.prompt(), "queue> ");

    session.execute("library/missing-one.flac", None);
    session.execute("http://radio.example/live", None);
    // Nothing is sent while the dialogue is open
    assert!(remote.flushes().is_empty());
    assert_eq!(session.pending().len(), 2);

    session.execute("", None);
    assert_eq!(session.mode(), Mode::Root);
    assert_eq!(
        remote.flushes(),
        vec![Call::SetQueue(vec![
            "library/missing-one.flac".to_string(),
            "http://radio.example/live".to_string(),
        ])]
    );
}

#[test]
fn test_seek_parsing() {
    let (mut session, remote) = session(FakeRemote::new());

    session.execute("seek x:30", None);
    assert!(remote.calls().is_empty());
    assert_eq!(
        message_texts(&mut session),
        vec!["invalid time \"x:30\" (expected [hh:][mm:]ss)"]
    );

    session.execute("seek 2:30", None);
    assert_eq!(remote.calls(), vec![Call::Seek(Duration::from_secs(150))]);
}

#[test]
fn test_playback_commands() {
    let (mut session, remote) = session(FakeRemote::new());

    for line in ["pause", "resume", "stop", "next", "prev", "volume 50%"] {
        session.execute(line, None);
    }

    assert_eq!(
        remote.calls(),
        vec![
            Call::Other("pause"),
            Call::Other("resume"),
            Call::Other("stop"),
            Call::Other("next"),
            Call::Other("prev"),
            Call::SetVolume(0.5),
        ]
    );
}

#[test]
fn test_library_commands() {
    let dir = tempfile::tempdir().unwrap();
    let absolute = fs::canonicalize(dir.path()).unwrap().to_string_lossy().to_string();
    let (mut session, remote) = session(FakeRemote::new());

    session.execute(&format!("add-folder {}", dir.path().display()), None);
    session.execute("folders", None);
    session.execute("sync", None);

    assert_eq!(
        remote.calls(),
        vec![
            Call::AddFolder(absolute),
            Call::Other("get_all_folders"),
            Call::Other("sync"),
        ]
    );
    let messages = message_texts(&mut session);
    assert!(messages.contains(&"/music".to_string()));
    assert!(messages.contains(&"Sync finished: 42 songs in library".to_string()));
}

#[test]
fn test_status_shows_track_volume_and_file() {
    let track = TrackInfo {
        name: "Dogs".to_string(),
        artist: "Pink Floyd".to_string(),
        album: "Animals".to_string(),
        duration_ms: 1_024_000,
        position_ms: 65_000,
        state: PlayerState::Playing,
        file_path: Some("pf/animals/02.flac".to_string()),
        volume: Some(80),
    };
    let (mut session, _remote) = session(FakeRemote::new().with_track(track));

    session.execute("status", None);

    assert_eq!(
        message_texts(&mut session),
        vec![
            "▶ Dogs - Pink Floyd (Animals)  1:05 / 17:04  vol 80%".to_string(),
            "pf/animals/02.flac".to_string(),
        ]
    );
}

#[test]
fn test_status_with_nothing_playing() {
    let (mut session, _remote) = session(FakeRemote::new());
    session.execute("status", None);
    assert_eq!(message_texts(&mut session), vec!["Nothing playing"]);
}

#[test]
fn test_leaving_mid_dialogue_reports_discarded_entries() {
    let (mut session, remote) = session(FakeRemote::new());

    session.execute("add-queue", None);
    session.execute("library/one.flac", None);
    session.execute("library/two.flac", None);
    session.take_messages();

    // What the prompt does on Ctrl-D
    assert_eq!(session.discard_pending(), 2);
    assert!(session.pending().is_empty());
    assert!(remote.flushes().is_empty());
    assert_eq!(
        message_texts(&mut session),
        vec!["2 pending song(s) discarded, not sent to the queue"]
    );

    // Nothing left, nothing reported
    assert_eq!(session.discard_pending(), 0);
    assert!(session.take_messages().is_empty());
}

#[test]
fn test_mount_is_persisted() {
    let music = tempfile::tempdir().unwrap();
    let config_dir = tempfile::tempdir().unwrap();
    let absolute = fs::canonicalize(music.path()).unwrap().to_string_lossy().to_string();
    let app = AppConfig::at(config_dir.path());

    let remote = Arc::new(FakeRemote::new());
    let mut session = Session::new(remote.clone())
        .with_state(PersistentState::default(), app.state_path());
    session.execute(&format!("mount {}", music.path().display()), None);

    assert_eq!(remote.calls(), vec![Call::SetMount(absolute.clone())]);
    let (_, state) = app.load();
    assert_eq!(state.mount, Some(absolute));
}

#[test]
fn test_add_folder_rejects_files() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("song.flac");
    File::create(&file).unwrap();
    let (mut session, remote) = session(FakeRemote::new());

    session.execute(&format!("add-folder {}", file.display()), None);

    assert!(remote.calls().is_empty());
    assert!(message_texts(&mut session)[0].ends_with("is not a directory"));
}

#[test]
fn test_unknown_command_and_quit() {
    let (mut session, _remote) = session(FakeRemote::new());

    session.execute("dance", None);
    assert_eq!(
        message_texts(&mut session),
        vec!["unknown command \"dance\" (try \"help\")"]
    );
    assert!(session.is_running());

    session.execute("quit", None);
    assert!(!session.is_running());
}
