use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Automatically saved session state
/// stored in `state.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistentState {
    /// Local directory mapped onto the library root (set by `mount`)
    #[serde(default)]
    pub mount: Option<String>,
}

impl PersistentState {
    /// Failures are logged, not returned
    pub fn save(&self, path: &Path) {
        let content = match toml::to_string_pretty(self) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize state");
                return;
            }
        };
        if let Err(e) = fs::write(path, content) {
            tracing::warn!(path = %path.display(), error = %e, "failed to save state");
        }
    }
}
