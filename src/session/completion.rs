use super::commands::{find_command, ArgKind, COMMANDS};
use super::mode::Mode;
use super::resolve::{expand_home, is_url, BrowseState};
use super::suggestion::{album_key, column_widths, Payload, Suggestion};
use crate::player::RemotePlayer;
use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a completion request looks at
pub struct CompletionContext<'a> {
    pub mode: Mode,
    /// Line up to the cursor
    pub line: &'a str,
    /// Terminal width in columns
    pub width: usize,
    pub browse: &'a BrowseState,
    pub remote: &'a dyn RemotePlayer,
}

/// Suggestions plus the byte offset in the line where replacement starts
#[derive(Debug, Default, PartialEq)]
pub struct Completion {
    pub start: usize,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone)]
struct DirItem {
    name: String,
    is_dir: bool,
}

/// Produces suggestions for the current mode and partial input.
///
/// Directory listings are cached per directory for the lifetime of the
/// engine. Files created afterwards only show up in a new session.
#[derive(Debug, Default)]
pub struct CompletionEngine {
    dir_cache: HashMap<PathBuf, Vec<DirItem>>,
}

impl CompletionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn complete(&mut self, ctx: &CompletionContext<'_>) -> Result<Completion> {
        match ctx.mode {
            Mode::Root => self.complete_root(ctx),
            Mode::QueueEntry => {
                if is_url(ctx.line.trim_start()) {
                    return Ok(Completion::default());
                }
                let start = ctx.line.len() - ctx.line.trim_start().len();
                Ok(Completion {
                    start,
                    suggestions: self.complete_path(&ctx.line[start..])?,
                })
            }
            Mode::ResultBrowse => {
                let (title_w, desc_w) = column_widths(ctx.width);
                let mut suggestions: Vec<Suggestion> = ctx
                    .browse
                    .results
                    .iter()
                    .cloned()
                    .map(|r| Suggestion::search_result(r).with_columns(title_w, desc_w))
                    .collect();
                suggestions.push(Suggestion::back());
                Ok(browse_completion(ctx.line, suggestions))
            }
            Mode::AlbumBrowse => {
                let mut suggestions = vec![Suggestion::select_all(ctx.browse.lookup.clone())];
                let albums: BTreeSet<&str> = ctx
                    .browse
                    .lookup
                    .iter()
                    .map(album_key)
                    .collect();
                // Blank albums sort first as "", display as (untitled)
                suggestions.extend(albums.into_iter().map(Suggestion::album));
                suggestions.push(Suggestion::back());
                Ok(browse_completion(ctx.line, suggestions))
            }
            Mode::SongBrowse => {
                let mut suggestions = vec![Suggestion::select_all(ctx.browse.songs.clone())];
                suggestions.extend(ctx.browse.songs.iter().cloned().map(Suggestion::entry));
                suggestions.push(Suggestion::back());
                Ok(browse_completion(ctx.line, suggestions))
            }
        }
    }

    fn complete_root(&mut self, ctx: &CompletionContext<'_>) -> Result<Completion> {
        let line = ctx.line;
        let lead = line.len() - line.trim_start().len();
        let trimmed = &line[lead..];

        // 1. Still typing the command name
        let Some(space) = trimmed.find(char::is_whitespace) else {
            let prefix = trimmed.to_lowercase();
            let suggestions = COMMANDS
                .iter()
                .filter(|c| c.name.starts_with(&prefix))
                .map(|c| Suggestion::new(c.name, None).with_description(c.description))
                .collect();
            return Ok(Completion {
                start: lead,
                suggestions,
            });
        };

        // 2. Command is complete, complete its argument
        let name = &trimmed[..space];
        let after = &trimmed[space..];
        let start = lead + space + (after.len() - after.trim_start().len());
        let remainder = &line[start..];

        let suggestions = match find_command(name).map(|c| c.arg) {
            Some(ArgKind::Path) => self.complete_path(remainder)?,
            Some(ArgKind::Queue) => self.complete_queue(remainder, ctx)?,
            _ => Vec::new(),
        };
        Ok(Completion { start, suggestions })
    }

    fn complete_queue(&mut self, remainder: &str, ctx: &CompletionContext<'_>) -> Result<Vec<Suggestion>> {
        if is_url(remainder) {
            // URLs are opaque
            return Ok(Vec::new());
        }
        if remainder.contains('/') {
            return self.complete_path(remainder);
        }
        if remainder.trim().is_empty() {
            return Ok(Vec::new());
        }

        let results = ctx.remote.search(remainder.trim())?;
        tracing::debug!(query = remainder, results = results.len(), "completion search");
        let (title_w, desc_w) = column_widths(ctx.width);
        Ok(results
            .into_iter()
            .map(|r| Suggestion::search_result(r).with_columns(title_w, desc_w))
            .collect())
    }

    /// Case-insensitive path completion. `~` is expanded for lookup but kept
    /// in the inserted text; hidden entries only show for a `.` prefix.
    pub fn complete_path(&mut self, partial: &str) -> Result<Vec<Suggestion>> {
        let (dir_part, prefix) = match partial.rfind('/') {
            Some(i) => (&partial[..=i], &partial[i + 1..]),
            None => ("", partial),
        };
        let dir = if dir_part.is_empty() {
            PathBuf::from(".")
        } else {
            expand_home(dir_part)
        };

        let prefix_lower = prefix.to_lowercase();
        let show_hidden = prefix.starts_with('.');
        let suggestions = self
            .list_dir(&dir)?
            .iter()
            .filter(|item| show_hidden || !item.name.starts_with('.'))
            .filter(|item| item.name.to_lowercase().starts_with(&prefix_lower))
            .map(|item| {
                let mut text = format!("{}{}", dir_part, item.name);
                let mut target = dir.join(&item.name).to_string_lossy().to_string();
                if item.is_dir {
                    text.push('/');
                    target.push('/');
                }
                Suggestion::new(text, Some(Payload::Path(target)))
            })
            .collect();
        Ok(suggestions)
    }

    fn list_dir(&mut self, dir: &Path) -> Result<&[DirItem]> {
        if !self.dir_cache.contains_key(dir) {
            let mut items = Vec::new();
            for entry in fs::read_dir(dir).with_context(|| format!("cannot list {}", dir.display()))? {
                let entry = entry?;
                // Follow symlinks so linked folders complete like folders
                let is_dir = fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false);
                items.push(DirItem {
                    name: entry.file_name().to_string_lossy().to_string(),
                    is_dir,
                });
            }
            items.sort_by_key(|item| item.name.to_lowercase());
            tracing::debug!(dir = %dir.display(), entries = items.len(), "cached directory listing");
            self.dir_cache.insert(dir.to_path_buf(), items);
        }
        Ok(self.dir_cache.get(dir).map(Vec::as_slice).unwrap_or_default())
    }
}

/// Browse lists are narrowed by what was typed so far (case-insensitive prefix)
fn browse_completion(line: &str, suggestions: Vec<Suggestion>) -> Completion {
    let typed = line.trim_start();
    let start = line.len() - typed.len();
    let typed = typed.to_lowercase();
    Completion {
        start,
        suggestions: suggestions
            .into_iter()
            .filter(|s| s.text.to_lowercase().starts_with(&typed))
            .collect(),
    }
}
