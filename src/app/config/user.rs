use serde::{Deserialize, Serialize};

/// User-editable configuration (ReadOnly by the shell after load)
/// stored in `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_music_dir")]
    pub music_directory: String,
    /// Max songs fetched per search request
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6600
}

fn default_music_dir() -> String {
    let home = dirs::home_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string());
    format!("{}/Music", home)
}

fn default_search_limit() -> u32 {
    50
}

fn default_history_size() -> usize {
    500
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            music_directory: default_music_dir(),
            search_limit: default_search_limit(),
            history_size: default_history_size(),
        }
    }
}
