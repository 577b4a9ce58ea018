//! File-backed credential storage.
//!
//! The token lives in a small JSON document next to the user profile the
//! auth service returned at login. Last writer wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vakya_core::error::SessionError;
use vakya_core::session::TokenStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Credentials {
    token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<serde_json::Value>,
    saved_at: DateTime<Utc>,
}

/// Persists the token to a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stores the user record returned with the token. Requires a token to
    /// already be saved.
    pub fn save_user(&self, user: &serde_json::Value) -> Result<(), SessionError> {
        let Some(mut creds) = self.read()? else {
            return Err(SessionError::Storage("no token to attach user to".into()));
        };
        creds.user = Some(user.clone());
        self.write(&creds)
    }

    /// The stored user record, if any.
    pub fn user(&self) -> Result<Option<serde_json::Value>, SessionError> {
        Ok(self.read()?.and_then(|c| c.user))
    }

    /// When the current token was saved.
    pub fn saved_at(&self) -> Result<Option<DateTime<Utc>>, SessionError> {
        Ok(self.read()?.map(|c| c.saved_at))
    }

    fn read(&self) -> Result<Option<Credentials>, SessionError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SessionError::Storage(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };
        match serde_json::from_str::<Credentials>(&content) {
            Ok(creds) if !creds.token.trim().is_empty() => Ok(Some(creds)),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable credentials file");
                Ok(None)
            }
        }
    }

    fn write(&self, creds: &Credentials) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SessionError::Storage(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(creds)
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| {
            SessionError::Storage(format!("failed to write {}: {e}", self.path.display()))
        })?;
        restrict_permissions(&self.path);
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
        tracing::warn!(path = %path.display(), error = %e, "could not restrict credentials file");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.read()?.map(|c| c.token))
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        self.write(&Credentials {
            token: token.to_string(),
            user: None,
            saved_at: Utc::now(),
        })
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Storage(format!(
                "failed to remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}
