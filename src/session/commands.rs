use crate::app::timespec::{parse_time_spec, parse_volume};
use crate::error::ShellError;
use std::time::Duration;

/// How a command's argument is completed and interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    None,
    /// Local directory
    Path,
    /// Search query, local file or URL
    Queue,
    /// Free text (time spec, volume)
    Text,
}

#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub arg: ArgKind,
}

pub const ADD_QUEUE: &str = "add-queue";
pub const SET_QUEUE: &str = "set-queue";

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec { name: ADD_QUEUE, usage: "[query|file|url]", description: "Add songs to the queue", arg: ArgKind::Queue },
    CommandSpec { name: SET_QUEUE, usage: "[query|file|url]", description: "Replace the queue", arg: ArgKind::Queue },
    CommandSpec { name: "add-folder", usage: "<dir>", description: "Add a folder to the library", arg: ArgKind::Path },
    CommandSpec { name: "mount", usage: "<dir>", description: "Set the local library mount point", arg: ArgKind::Path },
    CommandSpec { name: "folders", usage: "", description: "List library folders", arg: ArgKind::None },
    CommandSpec { name: "sync", usage: "", description: "Rescan the library", arg: ArgKind::None },
    CommandSpec { name: "pause", usage: "", description: "Pause playback", arg: ArgKind::None },
    CommandSpec { name: "resume", usage: "", description: "Resume playback", arg: ArgKind::None },
    CommandSpec { name: "stop", usage: "", description: "Stop playback", arg: ArgKind::None },
    CommandSpec { name: "next", usage: "", description: "Skip to the next track", arg: ArgKind::None },
    CommandSpec { name: "prev", usage: "", description: "Go back to the previous track", arg: ArgKind::None },
    CommandSpec { name: "seek", usage: "<[hh:][mm:]ss>", description: "Jump to a position in the track", arg: ArgKind::Text },
    CommandSpec { name: "volume", usage: "<0.0-1.0|NN%>", description: "Set the volume", arg: ArgKind::Text },
    CommandSpec { name: "status", usage: "", description: "Show the current track", arg: ArgKind::None },
    CommandSpec { name: "help", usage: "", description: "Show this list", arg: ArgKind::None },
    CommandSpec { name: "quit", usage: "", description: "Leave the shell", arg: ArgKind::None },
    CommandSpec { name: "exit", usage: "", description: "Leave the shell", arg: ArgKind::None },
];

/// A parsed root-mode command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Empty query opens the free-text queue dialogue
    AddQueue(String),
    SetQueue(String),
    AddFolder(String),
    Mount(String),
    Folders,
    Sync,
    Pause,
    Resume,
    Stop,
    Next,
    Prev,
    Seek(Duration),
    Volume(f32),
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse a root-mode line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, ShellError> {
        let (name, rest) = split_command(line);
        if name.is_empty() {
            return Ok(None);
        }
        let spec = find_command(name).ok_or_else(|| ShellError::UnknownCommand(name.to_string()))?;
        let rest = rest.trim_end();
        let required = |what: &'static str| {
            if rest.is_empty() {
                Err(ShellError::MissingArgument(what))
            } else {
                Ok(rest.to_string())
            }
        };

        let command = match spec.name {
            ADD_QUEUE => Command::AddQueue(rest.to_string()),
            SET_QUEUE => Command::SetQueue(rest.to_string()),
            "add-folder" => Command::AddFolder(required("directory")?),
            "mount" => Command::Mount(required("directory")?),
            "folders" => Command::Folders,
            "sync" => Command::Sync,
            "pause" => Command::Pause,
            "resume" => Command::Resume,
            "stop" => Command::Stop,
            "next" => Command::Next,
            "prev" => Command::Prev,
            "seek" => Command::Seek(parse_time_spec(&required("time")?)?),
            "volume" => Command::Volume(parse_volume(&required("volume")?)?),
            "status" => Command::Status,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

pub fn find_command(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Split a line into its command token and the (left-trimmed) remainder
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.find(char::is_whitespace) {
        Some(i) => (&line[..i], line[i..].trim_start()),
        None => (line, ""),
    }
}

/// Strip a leading `add-queue`/`set-queue` token, if any
pub fn strip_queue_command(input: &str) -> &str {
    let (cmd, rest) = split_command(input);
    if cmd.eq_ignore_ascii_case(ADD_QUEUE) || cmd.eq_ignore_ascii_case(SET_QUEUE) {
        rest
    } else {
        input
    }
}
