//! File-backed snapshot persistence
//!
//! Each collection is stored as one JSON file and always replaced as a
//! whole. Writes are atomic (write to temp file, then rename) so a crash
//! never leaves a half-written snapshot behind.
//!
//! Storage location: `~/.local/share/linkset/` (configurable via `Config`)
//!
//! Files:
//! - `links.json` - array of items
//! - `folders.json` - array of folder keys (`"Work/Frontend"`)
//! - `inbox.json` - captured links waiting to be merged

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};
use super::{CaptureInbox, FolderRegistry, ItemStore};
use crate::config::Config;
use crate::models::LinkItem;
use crate::path::FolderPath;

/// Snapshot persistence rooted at the configured data directory
pub struct JsonPersistence {
    config: Config,
}

impl JsonPersistence {
    /// Create a new persistence handler with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ItemStore for JsonPersistence {
    fn load_items(&self) -> StorageResult<Vec<LinkItem>> {
        Ok(read_snapshot(&self.config.items_path())?.unwrap_or_default())
    }

    fn replace_items(&self, items: &[LinkItem]) -> StorageResult<()> {
        write_snapshot(&self.config.items_path(), &items)
    }
}

impl FolderRegistry for JsonPersistence {
    fn load_folders(&self) -> StorageResult<Vec<FolderPath>> {
        let keys: Vec<String> = read_snapshot(&self.config.folders_path())?.unwrap_or_default();
        Ok(keys
            .iter()
            .map(|key| FolderPath::from_key(key))
            .filter(|path| !path.is_empty())
            .collect())
    }

    fn replace_folders(&self, folders: &[FolderPath]) -> StorageResult<()> {
        let keys: Vec<String> = folders.iter().map(FolderPath::to_key).collect();
        write_snapshot(&self.config.folders_path(), &keys)
    }
}

impl CaptureInbox for JsonPersistence {
    fn read_inbox(&self) -> StorageResult<Vec<Value>> {
        // Anything that is not an array counts as an empty inbox
        let value: Option<Value> = read_snapshot(&self.config.inbox_path())?;
        Ok(match value {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        })
    }

    fn append_inbox(&self, item: &LinkItem) -> StorageResult<()> {
        let mut entries = self.read_inbox()?;
        let value = serde_json::to_value(item).map_err(|source| StorageError::Encode {
            path: self.config.inbox_path(),
            source,
        })?;
        entries.push(value);
        write_snapshot(&self.config.inbox_path(), &entries)
    }

    fn clear_inbox(&self) -> StorageResult<()> {
        write_snapshot(&self.config.inbox_path(), &Vec::<Value>::new())
    }
}

/// Read and decode a JSON snapshot.
///
/// Returns `None` if the file doesn't exist. A file that exists but cannot
/// be decoded is moved aside to `<file>.corrupt.backup` and reported as
/// [`StorageError::CorruptDocument`].
pub(crate) fn read_snapshot<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let content =
        fs::read_to_string(path).map_err(|e| StorageError::from_read(e, path.to_path_buf()))?;

    match serde_json::from_str(&content) {
        Ok(value) => {
            debug!("Loaded {:?}", path);
            Ok(Some(value))
        }
        Err(e) => {
            let backup_path = backup_path_for(path);
            warn!("Corrupt snapshot {:?}, moving to {:?}", path, backup_path);
            fs::rename(path, &backup_path).map_err(|source| StorageError::AtomicWriteFailed {
                from: path.to_path_buf(),
                to: backup_path.clone(),
                source,
            })?;
            Err(StorageError::CorruptDocument {
                path: path.to_path_buf(),
                backup_path,
                details: e.to_string(),
            })
        }
    }
}

/// Encode a value as pretty JSON and write it atomically
pub(crate) fn write_snapshot<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, &bytes)
}

fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt.backup");
    path.with_file_name(name)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
