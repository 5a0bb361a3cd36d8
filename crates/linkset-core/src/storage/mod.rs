//! Storage layer
//!
//! Durable state is a handful of whole-collection snapshots:
//!
//! - **Item store**: every item, replaced as a whole on each save
//! - **Folder registry**: explicitly created folders, as `/`-joined keys
//! - **Capture inbox**: links captured outside a session, drained on open
//! - **Remote mirror**: an optional copy for moving data between machines
//!
//! The traits below are the seams the [`Store`](crate::store::Store) talks
//! to; [`JsonPersistence`] and [`DirectoryMirror`] are the file-backed
//! implementations.

pub mod error;
pub mod mirror;
pub mod persistence;

use serde_json::Value;

use crate::models::LinkItem;
use crate::path::FolderPath;

pub use error::{StorageError, StorageResult};
pub use mirror::{DirectoryMirror, MirrorError, RemoteMirror, MIRROR_FILE, MIRROR_KEY};
pub use persistence::JsonPersistence;

/// Durable home of the item collection
pub trait ItemStore {
    fn load_items(&self) -> StorageResult<Vec<LinkItem>>;
    fn replace_items(&self, items: &[LinkItem]) -> StorageResult<()>;
}

/// Durable home of explicitly created folders
pub trait FolderRegistry {
    fn load_folders(&self) -> StorageResult<Vec<FolderPath>>;
    fn replace_folders(&self, folders: &[FolderPath]) -> StorageResult<()>;
}

/// Links captured while no session was open
pub trait CaptureInbox {
    /// Raw entries; may contain anything a capturer wrote
    fn read_inbox(&self) -> StorageResult<Vec<Value>>;
    fn append_inbox(&self, item: &LinkItem) -> StorageResult<()>;
    fn clear_inbox(&self) -> StorageResult<()>;
}
