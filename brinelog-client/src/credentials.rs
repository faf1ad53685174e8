//! Persistent admin credential storage
//!
//! The credential is a single opaque string kept in a file under the
//! platform config directory. It is read per outbound call; the file is
//! the single source of truth, so there is no in-memory cache to
//! invalidate when the login surface stores a new password.

use brinelog_common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

/// File-backed credential store
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored credential, if any
    ///
    /// A missing or empty file means "no credential"; requests go out
    /// unauthenticated, which is legal.
    pub fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let credential = contents.trim();
                if credential.is_empty() {
                    None
                } else {
                    Some(credential.to_string())
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("credential file unreadable: {}", e);
                None
            }
        }
    }

    /// Persist a credential, creating parent directories as needed
    pub fn store(&self, credential: &str) -> Result<()> {
        if credential.trim().is_empty() {
            return Err(Error::InvalidInput("credential must not be empty".to_string()));
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, credential.trim())?;
        Ok(())
    }

    /// Remove the stored credential. Already-absent is not an error.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
