use clap::{Parser, Subcommand};

/// vyomsh - drive your MPD library from a prompt 🎵
#[derive(Parser, Debug)]
#[command(name = "vyomsh", version, about)]
pub struct Args {
    /// MPD host (defaults to config.toml, then localhost)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// MPD port (defaults to config.toml, then 6600)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Add songs, albums, artists, files or URLs to the queue
    AddQueue {
        /// Search text, local file or URL (empty: enter paths line by line)
        query: Vec<String>,
    },
    /// Replace the queue
    SetQueue {
        /// Search text, local file or URL (empty: enter paths line by line)
        query: Vec<String>,
    },
    /// Add a folder to the library
    AddFolder { path: String },
    /// Set the local directory that maps onto the library root
    Mount { path: String },
    /// List library folders
    Folders,
    /// Rescan the library
    Sync,
    /// Pause playback
    Pause,
    /// Resume playback
    Resume,
    /// Stop playback
    Stop,
    /// Skip to the next track
    Next,
    /// Go back to the previous track
    Prev,
    /// Jump to [hh:][mm:]ss in the current track
    Seek { time: String },
    /// Set the volume (0.0-1.0 or NN%)
    Volume { level: String },
    /// Show the current track
    Status,
    /// Start the interactive prompt (default)
    Shell,
    /// Print the default config.toml to stdout
    GenerateConfig,
}
