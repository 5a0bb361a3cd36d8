//! Storage errors
//!
//! A failed write never loses the in-memory library, so the hints attached
//! here mostly point the user at `linkset export` as a stopgap backup.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No space left while writing '{path}'")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Snapshot was not valid JSON and has been moved to `backup_path`
    #[error("Snapshot '{path}' is corrupted: {details}. It was moved to '{backup_path}'.")]
    CorruptDocument {
        path: PathBuf,
        backup_path: PathBuf,
        details: String,
    },

    #[error("Failed to encode '{path}': {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// The final rename of an atomic write (or a corrupt-file move) failed
    #[error("Could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Classify an I/O error raised while writing `path`
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::NotFound => Self::NotFound { path },
            _ if is_disk_full(&error) => Self::DiskFull {
                path,
                source: error,
            },
            _ => Self::WriteError {
                path,
                source: error,
            },
        }
    }

    /// Classify an I/O error raised while reading `path`
    pub fn from_read(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::ReadError {
                path,
                source: error,
            },
        }
    }

    /// Hint shown next to a failed save
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::DiskFull { .. } => {
                Some("Free up disk space. Until then, `linkset export -o -` keeps a copy of your links.")
            }
            Self::PermissionDenied { .. } | Self::CreateDirectory { .. } => {
                Some("Check that the data directory is writable, or point data_dir somewhere else.")
            }
            Self::CorruptDocument { .. } => {
                Some("The backup can be loaded again with `linkset import json <backup>`.")
            }
            Self::WriteError { .. } | Self::AtomicWriteFailed { .. } => {
                Some("Your changes are kept for this session only. Export your links to JSON as a backup.")
            }
            _ => None,
        }
    }
}

/// Not every platform reports `StorageFull`, so the message is checked too
fn is_disk_full(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left") || msg.contains("quota exceeded") || msg.contains("disk full")
}

pub type StorageResult<T> = Result<T, StorageError>;
