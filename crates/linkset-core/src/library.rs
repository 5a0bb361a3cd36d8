//! In-memory library state
//!
//! A [`Library`] holds the flat item collection and the folder registry.
//! All operations here are pure in-memory mutations; persistence is the
//! caller's concern (see [`crate::store::Store`]).

use uuid::Uuid;

use crate::models::LinkItem;
use crate::path::FolderPath;
use crate::tree::{build_tree, TreeNode};

/// Items plus explicitly created folders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    /// Saved links, newest first
    pub items: Vec<LinkItem>,
    /// Folder registry; entries may have no items under them
    pub folders: Vec<FolderPath>,
}

impl Library {
    pub fn new(items: Vec<LinkItem>, folders: Vec<FolderPath>) -> Self {
        Self { items, folders }
    }

    /// Add an item at the front of the collection.
    ///
    /// URL uniqueness is not checked here; only imports deduplicate.
    pub fn add_item(&mut self, item: LinkItem) {
        self.items.insert(0, item);
    }

    /// Replace the item with the same id. Returns false if none exists.
    pub fn update_item(&mut self, item: LinkItem) -> bool {
        match self.items.iter_mut().find(|it| it.id == item.id) {
            Some(existing) => {
                *existing = item;
                true
            }
            None => false,
        }
    }

    /// Remove an item by id, returning it
    pub fn remove_item(&mut self, id: Uuid) -> Option<LinkItem> {
        let pos = self.items.iter().position(|it| it.id == id)?;
        Some(self.items.remove(pos))
    }

    pub fn get_item(&self, id: Uuid) -> Option<&LinkItem> {
        self.items.iter().find(|it| it.id == id)
    }

    /// Items whose id starts with `prefix` (for short ids on the command line)
    pub fn find_by_id_prefix(&self, prefix: &str) -> Vec<&LinkItem> {
        let prefix = prefix.to_lowercase();
        self.items
            .iter()
            .filter(|it| it.id.to_string().starts_with(&prefix))
            .collect()
    }

    /// True if the registry holds exactly this path
    pub fn has_folder(&self, path: &FolderPath) -> bool {
        self.folders.iter().any(|f| f == path)
    }

    /// Derive the folder tree
    pub fn tree(&self) -> TreeNode {
        build_tree(&self.items, &self.folders)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }
}
