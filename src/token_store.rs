use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::StoreError;

const TOKEN_FILE_NAME: &str = "token";

/// Owns the single bearer token persisted for this user.
///
/// A token supplied through the environment always wins and is never
/// written to disk.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
    env_override: Option<String>,
}

impl TokenStore {
    pub fn new(dir: PathBuf, env_override: Option<String>) -> Self {
        Self {
            dir,
            env_override: env_override.filter(|token| !token.is_empty()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.config_dir.clone(), config.token_override.clone())
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE_NAME)
    }

    pub fn has_override(&self) -> bool {
        self.env_override.is_some()
    }

    pub fn resolve_token(&self) -> Result<String, StoreError> {
        if let Some(token) = &self.env_override {
            return Ok(token.clone());
        }

        let path = self.path();
        match fs::read_to_string(&path) {
            Ok(token) if token.is_empty() => Err(StoreError::NotLoggedIn),
            Ok(token) => Ok(token),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotLoggedIn)
            }
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.resolve_token().is_ok()
    }

    /// Replaces the stored token. The new contents are written to a
    /// sibling file first and renamed into place.
    pub fn persist_token(&self, token: &str) -> Result<(), StoreError> {
        create_private_dir(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let path = self.path();
        let updated_path = path.with_extension("updated");
        let written = create_private_file(&updated_path)
            .and_then(|mut f| {
                f.write_all(token.as_bytes())?;
                f.sync_all()
            })
            .and_then(|_| fs::rename(&updated_path, &path));

        if let Err(e) = written {
            // A partial token must not stay on disk.
            let _ = fs::remove_file(&updated_path);
            return Err(StoreError::io(&path, e));
        }
        debug!(path = %path.display(), "saved auth token");
        Ok(())
    }

    pub fn delete_token(&self) -> Result<(), StoreError> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed auth token");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn create_private_file(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // A leftover file from an interrupted write keeps its old mode.
    f.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(f)
}

#[cfg(not(unix))]
fn create_private_file(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
