//! On-disk locations for the credential and settings files.

use std::path::PathBuf;

/// File locations under the user config directory, respecting
/// `XDG_CONFIG_HOME`. Constructed once per process and passed to the
/// stores that need it.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Config directory (~/.config/bc4 or XDG_CONFIG_HOME/bc4)
    pub config: PathBuf,
}

impl Paths {
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let config = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".config"))
            .join("bc4");
        Self { config }
    }

    /// Stored OAuth credential.
    pub fn token_file(&self) -> PathBuf {
        self.config.join("token.json")
    }

    /// Default account/project settings.
    pub fn settings_file(&self) -> PathBuf {
        self.config.join("config.json")
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}
