use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub mod persistence;
pub mod user;

pub use persistence::PersistentState;
pub use user::UserConfig;

/// The directory holding `config.toml`, `state.toml`, history and logs 📁
#[derive(Debug, Clone)]
pub struct AppConfig {
    dir: PathBuf,
}

impl AppConfig {
    /// `~/.config/vyomsh`, created on first use
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::at(home.join(".config").join("vyomsh"))
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot create config directory");
        }
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join("config.toml")
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join("state.toml")
    }

    pub fn history_path(&self) -> PathBuf {
        self.dir.join("history.txt")
    }

    /// Config and saved state. A missing config.toml is written with
    /// defaults; broken files are logged and replaced by defaults in memory.
    pub fn load(&self) -> (UserConfig, PersistentState) {
        let config_path = self.config_path();
        let config = if config_path.exists() {
            read_toml(&config_path).unwrap_or_default()
        } else {
            let config = UserConfig::default();
            if let Err(e) = write_default(&config_path) {
                tracing::warn!(error = %e, "could not write default config");
            }
            config
        };

        let state = read_toml(&self.state_path()).unwrap_or_default();
        (config, state)
    }

    /// Default `config.toml` contents, for `generate-config`
    pub fn default_config_toml() -> Result<String> {
        Ok(toml::to_string_pretty(&UserConfig::default())?)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn write_default(path: &Path) -> Result<()> {
    let content = AppConfig::default_config_toml()?;
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let content = fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid file");
            None
        }
    }
}
