//! Persistent session token storage
//!
//! The token lives in a single file named [`TOKEN_KEY`] inside the configured
//! state directory. Every read goes to disk so a token cleared by one process
//! is never served from memory by another.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Fixed storage key of the session token
pub const TOKEN_KEY: &str = "AUTH_TOKEN";

/// File-backed token store
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store keeping its token under `state_dir`
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(TOKEN_KEY),
        }
    }

    /// Location of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token; a missing or blank file means no token
    pub fn load(&self) -> ClientResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::Storage(e)),
        }
    }

    /// Whether a token is currently stored
    pub fn is_present(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }

    /// Persist a new token, replacing any previous one
    pub fn save(&self, token: &str) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(ClientError::Storage)?;
        }
        fs::write(&self.path, token).map_err(ClientError::Storage)?;
        restrict_permissions(&self.path)?;
        debug!("Session token stored at {}", self.path.display());
        Ok(())
    }

    /// Remove the stored token; clearing an empty store is not an error
    pub fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Session token cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(e)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> ClientResult<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(ClientError::Storage)
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> ClientResult<()> {
    Ok(())
}
