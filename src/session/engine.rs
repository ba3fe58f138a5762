use super::commands::{strip_queue_command, Command, COMMANDS};
use super::completion::{Completion, CompletionContext, CompletionEngine};
use super::mode::{Mode, ModeStack};
use super::queue::{QueueAccumulator, QueueOrigin};
use super::resolve::{absolute_path, expand_home, BrowseState};
use super::suggestion::Suggestion;
use crate::app::config::PersistentState;
use crate::error::ShellError;
use crate::player::{LookupEntry, PlayerState, RemotePlayer, SyncProgress};
use crate::ui::{self, Level, Message};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// One interactive session: mode stack, accumulator, completion cache and
/// whatever browse state the current sub-dialogue needs.
pub struct Session {
    pub(super) remote: Arc<dyn RemotePlayer>,
    pub(super) modes: ModeStack,
    pub(super) queue: QueueAccumulator,
    pub(super) origin: QueueOrigin,
    pub(super) browse: BrowseState,
    completion: CompletionEngine,
    /// Suggestions from the last completion request
    offered: Vec<Suggestion>,
    messages: Vec<Message>,
    /// Print messages as they happen instead of buffering them
    echo: bool,
    /// Saved to the path when the mount changes; `None` keeps it in memory
    state: Option<(PersistentState, PathBuf)>,
    running: bool,
}

impl Session {
    pub fn new(remote: Arc<dyn RemotePlayer>) -> Self {
        Self {
            remote,
            modes: ModeStack::default(),
            queue: QueueAccumulator::new(),
            origin: QueueOrigin::default(),
            browse: BrowseState::default(),
            completion: CompletionEngine::new(),
            offered: Vec::new(),
            messages: Vec::new(),
            echo: false,
            state: None,
            running: true,
        }
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn with_state(mut self, state: PersistentState, path: PathBuf) -> Self {
        self.state = Some((state, path));
        self
    }

    pub fn modes(&self) -> &ModeStack {
        &self.modes
    }

    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    pub fn prompt(&self) -> &'static str {
        self.modes.prompt()
    }

    pub fn origin(&self) -> QueueOrigin {
        self.origin
    }

    /// Entries waiting for the next flush
    pub fn pending(&self) -> &[LookupEntry] {
        self.queue.entries()
    }

    pub fn browse(&self) -> &BrowseState {
        &self.browse
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Drop whatever was never sent (leaving mid-dialogue, or after a failed
    /// flush) and tell the user how much was lost.
    pub fn discard_pending(&mut self) -> usize {
        let count = self.queue.len();
        if count > 0 {
            tracing::warn!(count, "discarding unsent entries");
            self.queue.clear();
            self.error(format!("{} pending song(s) discarded, not sent to the queue", count));
        }
        count
    }

    pub fn take_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    pub(super) fn info(&mut self, text: impl Into<String>) {
        self.notify(Level::Info, text.into());
    }

    pub(super) fn error(&mut self, text: impl Into<String>) {
        self.notify(Level::Error, text.into());
    }

    fn notify(&mut self, level: Level, text: String) {
        let message = Message { level, text };
        if self.echo {
            ui::print_message(&message);
        } else {
            self.messages.push(message);
        }
    }

    /// Suggestions for `line` (text up to the cursor). Failures are reported
    /// and produce an empty list.
    pub fn complete(&mut self, line: &str, width: usize) -> Completion {
        let ctx = CompletionContext {
            mode: self.modes.current(),
            line,
            width,
            browse: &self.browse,
            remote: self.remote.as_ref(),
        };
        let completion = match self.completion.complete(&ctx) {
            Ok(completion) => completion,
            Err(e) => {
                tracing::warn!(error = %e, "completion failed");
                // Never printed mid-edit; the prompt shows it after the line
                self.messages.push(Message {
                    level: Level::Error,
                    text: format!("{:#}", e),
                });
                Completion::default()
            }
        };
        self.offered = completion.suggestions.clone();
        completion
    }

    /// Run one submitted line. `selected` is the suggestion the user picked,
    /// if the line editor knows it.
    pub fn execute(&mut self, line: &str, selected: Option<Suggestion>) {
        let selected = selected.or_else(|| self.recover_selection(line));
        self.offered.clear();

        let result = match self.modes.current() {
            Mode::Root => self.execute_root(line, selected),
            Mode::QueueEntry => self.execute_queue_entry(line),
            Mode::ResultBrowse | Mode::SongBrowse => self.execute_pick(line, selected),
            Mode::AlbumBrowse => self.execute_album_browse(line, selected),
        };
        if let Err(e) = result {
            self.error(format!("{:#}", e));
        }

        if let Err(e) = self.flush_if_done() {
            self.error(format!("{:#}", e));
        }
    }

    /// Run an already parsed root command (CLI entry point). Unlike
    /// [`Session::execute`], failures are returned to the caller.
    pub fn run(&mut self, command: Command, selected: Option<Suggestion>) -> Result<()> {
        let result = self.run_command(command, selected);
        self.flush_if_done()?;
        result
    }

    /// The user typed a suggestion's text instead of picking it: find it
    /// among what was offered, first match wins.
    fn recover_selection(&mut self, line: &str) -> Option<Suggestion> {
        let mode = self.modes.current();
        let typed = match mode {
            Mode::Root => strip_queue_command(line.trim()),
            _ => line.trim(),
        };
        if typed.is_empty() {
            return None;
        }

        // Browse lists are local, so they can be rebuilt when nothing was offered
        if self.offered.is_empty() && !matches!(mode, Mode::Root | Mode::QueueEntry) {
            self.complete("", 80);
        }

        let typed = typed.to_lowercase();
        self.offered
            .iter()
            .find(|s| s.text.to_lowercase() == typed)
            .cloned()
    }

    fn execute_root(&mut self, line: &str, selected: Option<Suggestion>) -> Result<()> {
        match Command::parse(line)? {
            Some(command) => self.run_command(command, selected),
            None => Ok(()),
        }
    }

    fn run_command(&mut self, command: Command, selected: Option<Suggestion>) -> Result<()> {
        tracing::debug!(?command, "dispatch");
        match command {
            Command::AddQueue(query) => self.start_queue(QueueOrigin::Add, &query, selected),
            Command::SetQueue(query) => self.start_queue(QueueOrigin::Set, &query, selected),
            Command::AddFolder(dir) => {
                let dir = existing_dir(&dir)?;
                self.remote.add_folder(&dir)?;
                self.info(format!("Folder added: {}", dir.display()));
                Ok(())
            }
            Command::Mount(dir) => {
                let dir = existing_dir(&dir)?;
                self.remote.set_mount(&dir)?;
                if let Some((state, path)) = self.state.as_mut() {
                    state.mount = Some(dir.to_string_lossy().to_string());
                    state.save(path);
                }
                self.info(format!("Mount set to {}", dir.display()));
                Ok(())
            }
            Command::Folders => {
                let folders = self.remote.get_all_folders()?;
                if folders.is_empty() {
                    self.info("No folders");
                }
                for folder in folders {
                    self.info(folder);
                }
                Ok(())
            }
            Command::Sync => {
                let remote = Arc::clone(&self.remote);
                remote.sync(&mut |progress| {
                    let text = match progress {
                        SyncProgress::Started { job } => format!("Sync started (job {})", job),
                        SyncProgress::Running { elapsed, .. } => {
                            format!("Syncing... {}s", elapsed.as_secs())
                        }
                        SyncProgress::Finished { songs } => {
                            format!("Sync finished: {} songs in library", songs)
                        }
                    };
                    self.info(text);
                })?;
                Ok(())
            }
            Command::Pause => {
                self.remote.pause()?;
                self.info("Paused");
                Ok(())
            }
            Command::Resume => {
                self.remote.resume()?;
                self.info("Resumed");
                Ok(())
            }
            Command::Stop => {
                self.remote.stop()?;
                self.info("Stopped");
                Ok(())
            }
            Command::Next => {
                self.remote.next()?;
                self.info("Skipped to next track");
                Ok(())
            }
            Command::Prev => {
                self.remote.prev()?;
                self.info("Back to previous track");
                Ok(())
            }
            Command::Seek(position) => {
                self.remote.seek(position)?;
                self.info(format!("Seeked to {}", ui::format_duration(position.as_secs())));
                Ok(())
            }
            Command::Volume(fraction) => {
                self.remote.set_volume(fraction)?;
                self.info(format!("Volume set to {}%", (fraction * 100.0).round()));
                Ok(())
            }
            Command::Status => {
                match self.remote.get_current_track()? {
                    Some(track) => {
                        let icon = match track.state {
                            PlayerState::Playing => "▶",
                            PlayerState::Paused => "⏸",
                            PlayerState::Stopped => "■",
                        };
                        let volume = track
                            .volume
                            .map(|v| format!("  vol {}%", v))
                            .unwrap_or_default();
                        self.info(format!(
                            "{} {} - {} ({})  {} / {}{}",
                            icon,
                            track.name,
                            track.artist,
                            track.album,
                            ui::format_duration(track.position_ms / 1000),
                            ui::format_duration(track.duration_ms / 1000),
                            volume,
                        ));
                        if let Some(path) = track.file_path {
                            self.info(path);
                        }
                    }
                    None => self.info("Nothing playing"),
                }
                Ok(())
            }
            Command::Help => {
                for spec in COMMANDS {
                    self.info(format!("{:<11} {:<17} {}", spec.name, spec.usage, spec.description));
                }
                Ok(())
            }
            Command::Quit => {
                self.running = false;
                Ok(())
            }
        }
    }

    fn start_queue(&mut self, origin: QueueOrigin, query: &str, selected: Option<Suggestion>) -> Result<()> {
        self.origin = origin;
        if query.trim().is_empty() {
            self.modes.replace(Mode::QueueEntry);
            self.info("Enter one file or URL per line, blank line to finish");
            return Ok(());
        }
        self.resolve(query, selected.and_then(|s| s.payload))?;
        Ok(())
    }

    fn execute_queue_entry(&mut self, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            self.modes.replace(Mode::Root);
            return Ok(());
        }

        let local = expand_home(line);
        let path = if local.exists() {
            absolute_path(&local)?.to_string_lossy().to_string()
        } else {
            line.to_string()
        };
        self.queue.push(LookupEntry::from_path(path));
        Ok(())
    }

    /// ResultBrowse and SongBrowse: every valid pick carries a payload
    fn execute_pick(&mut self, line: &str, selected: Option<Suggestion>) -> Result<()> {
        if line.trim().is_empty() {
            self.modes.reset();
            self.info("Cancelled");
            return Ok(());
        }
        match selected.and_then(|s| s.payload) {
            Some(payload) => {
                self.apply_payload(payload)?;
            }
            None => self.info(format!("no such entry \"{}\"", line.trim())),
        }
        Ok(())
    }

    fn execute_album_browse(&mut self, line: &str, selected: Option<Suggestion>) -> Result<()> {
        if line.trim().is_empty() {
            self.modes.reset();
            self.info("Cancelled");
            return Ok(());
        }
        match selected {
            Some(Suggestion { payload: Some(payload), .. }) => {
                self.apply_payload(payload)?;
            }
            Some(Suggestion { text, payload: None, .. }) => {
                self.open_album(&text)?;
            }
            None => {
                self.open_album(line.trim())?;
            }
        }
        Ok(())
    }

    /// Send the accumulator once every sub-dialogue is closed. On failure the
    /// entries stay put for the next attempt.
    fn flush_if_done(&mut self) -> Result<()> {
        if !self.modes.is_at_base() || self.modes.base() == Mode::QueueEntry || self.queue.is_empty() {
            return Ok(());
        }
        match self.queue.flush(self.remote.as_ref(), self.origin) {
            Ok(count) => {
                let text = match self.origin {
                    QueueOrigin::Add => format!("Added {} song(s) to the queue", count),
                    QueueOrigin::Set => format!("Queue replaced with {} song(s)", count),
                };
                self.info(text);
                self.origin = QueueOrigin::Add;
                Ok(())
            }
            Err(e) => {
                let kept = self.queue.len();
                tracing::warn!(error = %e, kept, "flush failed");
                Err(e.context(format!("{} song(s) kept, they are sent with the next flush", kept)))
            }
        }
    }
}

fn existing_dir(input: &str) -> Result<PathBuf> {
    let path = expand_home(input.trim());
    if !path.exists() {
        return Err(ShellError::NotFound(path).into());
    }
    if !path.is_dir() {
        return Err(ShellError::NotADirectory(path).into());
    }
    absolute_path(&path)
}
