//! Credential storage in a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AuthError;

/// A stored OAuth credential.
///
/// `obtained_at` is stamped locally when the token response arrives and is
/// never taken from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub obtained_at: i64,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    7200
}

impl Credential {
    /// Seconds of validity left, negative once past expiry.
    pub fn remaining(&self) -> i64 {
        self.expires_in - (Utc::now().timestamp() - self.obtained_at)
    }

    /// Check if the token expires within the given number of seconds.
    pub fn expires_within(&self, seconds: i64) -> bool {
        self.remaining() < seconds
    }
}

/// Single-record credential storage.
///
/// The file is overwritten whole on every save; concurrent CLI invocations
/// may race on the write, which is an accepted limitation.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored credential.
    ///
    /// A missing, unreadable, or malformed file means "no credential",
    /// never a fatal error.
    pub fn load(&self) -> Option<Credential> {
        let data = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&data) {
            Ok(cred) => Some(cred),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "ignoring malformed credential file");
                None
            }
        }
    }

    /// Save the credential, creating parent directories as needed and
    /// restricting the file to owner read/write.
    pub fn save(&self, credential: &Credential) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(credential)
            .map_err(|e| AuthError::Storage(std::io::Error::other(e)))?;
        fs::write(&self.path, json)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        debug!(path = %self.path.display(), "credential saved");
        Ok(())
    }

    /// Delete the stored credential (logout). Missing file is fine.
    pub fn delete(&self) -> std::io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, TokenStore) {
        let tmp = TempDir::new().unwrap();
        let store = TokenStore::new(tmp.path().join("bc4").join("token.json"));
        (tmp, store)
    }

    fn credential() -> Credential {
        Credential {
            access_token: "access".into(),
            refresh_token: Some("refresh".into()),
            obtained_at: Utc::now().timestamp(),
            expires_in: 7200,
        }
    }

    #[test]
    fn test_load_missing_file() {
        let (_tmp, store) = store();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_load_malformed_file() {
        let (_tmp, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json {").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let (_tmp, store) = store();
        let cred = credential();
        store.save(&cred).unwrap();
        assert_eq!(store.load().unwrap(), cred);
    }

    #[test]
    fn test_save_overwrites() {
        let (_tmp, store) = store();
        store.save(&credential()).unwrap();
        let newer = Credential {
            access_token: "newer".into(),
            ..credential()
        };
        store.save(&newer).unwrap();
        assert_eq!(store.load().unwrap().access_token, "newer");
    }

    #[cfg(unix)]
    #[test]
    fn test_save_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let (_tmp, store) = store();
        store.save(&credential()).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_tmp, store) = store();
        store.delete().unwrap();
        store.save(&credential()).unwrap();
        store.delete().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_load_defaults_missing_fields() {
        let (_tmp, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"access_token": "only"}"#).unwrap();
        let cred = store.load().unwrap();
        assert_eq!(cred.access_token, "only");
        assert_eq!(cred.refresh_token, None);
        assert_eq!(cred.obtained_at, 0);
        assert_eq!(cred.expires_in, 7200);
    }

    #[test]
    fn test_expires_within() {
        let now = Utc::now().timestamp();
        let fresh = Credential {
            obtained_at: now,
            ..credential()
        };
        assert!(!fresh.expires_within(300));

        // 200 seconds of validity left, inside the 5-minute margin
        let stale = Credential {
            obtained_at: now - 7000,
            ..credential()
        };
        assert!(stale.expires_within(300));
        assert!(stale.remaining() <= 200);
    }
}
