//! Local settings: the default account and project.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persisted CLI settings.
///
/// A missing or corrupt file loads as empty settings; commands that change
/// a default call [`Settings::save`] afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project_id: Option<String>,
    #[serde(skip)]
    path: PathBuf,
}

impl Settings {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut settings = fs::read_to_string(&path)
            .ok()
            .and_then(|data| match serde_json::from_str::<Settings>(&data) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "ignoring malformed settings file");
                    None
                }
            })
            .unwrap_or_default();
        settings.path = path;
        settings
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
