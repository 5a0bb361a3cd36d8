//! Remote mirror
//!
//! A whole-collection copy kept somewhere outside the data directory.
//! Push overwrites the remote unconditionally; pull hands back whatever
//! entries are there so the caller can merge them like any other import.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use super::error::StorageError;
use super::persistence::write_snapshot;
use crate::models::LinkItem;

/// Fixed name of the mirrored collection
pub const MIRROR_KEY: &str = "linkset:links";

/// File name used for [`MIRROR_KEY`] by [`DirectoryMirror`]
pub const MIRROR_FILE: &str = "linkset-links.json";

#[derive(Error, Debug)]
pub enum MirrorError {
    /// No mirror is configured on this host
    #[error("Remote mirror is not available: {0}")]
    Unavailable(String),

    /// The remote file is not valid JSON; it is left untouched
    #[error("Remote data in '{path}' could not be decoded: {details}")]
    Malformed { path: PathBuf, details: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A place the whole collection can be pushed to and pulled from
pub trait RemoteMirror {
    /// Replace the remote collection with `items`
    fn push(&self, items: &[LinkItem]) -> Result<(), MirrorError>;

    /// Raw remote entries, or `None` when the remote holds nothing
    fn pull(&self) -> Result<Option<Vec<Value>>, MirrorError>;
}

/// Mirror backed by a directory, e.g. one kept in sync by a cloud drive
pub struct DirectoryMirror {
    dir: PathBuf,
}

impl DirectoryMirror {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Mirror for the configured directory, if there is one
    pub fn from_config(dir: Option<&Path>) -> Result<Self, MirrorError> {
        dir.map(Self::new).ok_or_else(|| {
            MirrorError::Unavailable(
                "no mirror_dir configured (set LINKSET_MIRROR_DIR or mirror_dir in config.toml)"
                    .to_string(),
            )
        })
    }

    pub fn file_path(&self) -> PathBuf {
        self.dir.join(MIRROR_FILE)
    }
}

impl RemoteMirror for DirectoryMirror {
    fn push(&self, items: &[LinkItem]) -> Result<(), MirrorError> {
        write_snapshot(&self.file_path(), items)?;
        info!("Pushed {} items to {}", items.len(), MIRROR_KEY);
        Ok(())
    }

    fn pull(&self) -> Result<Option<Vec<Value>>, MirrorError> {
        let path = self.file_path();
        if !path.exists() {
            debug!("No remote data under {}", MIRROR_KEY);
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).map_err(|e| StorageError::from_read(e, path.clone()))?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| MirrorError::Malformed {
                path: path.clone(),
                details: e.to_string(),
            })?;

        let entries = match value {
            Value::Array(entries) if !entries.is_empty() => entries,
            _ => {
                debug!("No remote data under {}", MIRROR_KEY);
                return Ok(None);
            }
        };
        debug!("Pulled {} entries from {}", entries.len(), MIRROR_KEY);
        Ok(Some(entries))
    }
}
