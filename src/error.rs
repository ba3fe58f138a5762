use std::path::PathBuf;
use thiserror::Error;

/// Local validation failures. These abort the current command but never the session.
#[derive(Debug, Error, PartialEq)]
pub enum ShellError {
    #[error("invalid time \"{0}\" (expected [hh:][mm:]ss)")]
    InvalidTimeSpec(String),
    #[error("invalid volume \"{0}\" (expected 0.0-1.0 or 0-100%)")]
    InvalidVolume(String),
    #[error("{} is a directory", .0.display())]
    IsADirectory(PathBuf),
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("unknown command \"{0}\" (try \"help\")")]
    UnknownCommand(String),
}
