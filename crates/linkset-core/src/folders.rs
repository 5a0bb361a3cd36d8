//! Folder mutations
//!
//! Folders exist implicitly, either as a registry entry or as a prefix of
//! some item's path. Renaming or deleting a folder therefore rewrites both
//! collections: every registry entry and every item whose (effective) path
//! has the folder as a prefix.
//!
//! Each operation computes the new registry and the new item list first and
//! only then swaps them in, so the two collections never disagree.

use tracing::{debug, info};

use crate::library::Library;
use crate::path::FolderPath;

/// How many registry entries and items a folder operation touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderChange {
    pub folders: usize,
    pub items: usize,
}

impl FolderChange {
    pub fn is_empty(&self) -> bool {
        self.folders == 0 && self.items == 0
    }
}

impl Library {
    /// Register `parent + [name]` as a folder.
    ///
    /// Returns the new path, or `None` when the name is not a valid
    /// segment (see [`FolderPath::segment_name`]) or the path is already
    /// registered.
    pub fn add_folder(&mut self, parent: &FolderPath, name: &str) -> Option<FolderPath> {
        let segment = FolderPath::segment_name(name)?;
        let path = parent.child(segment);
        if self.has_folder(&path) {
            debug!("Folder {} already registered", path);
            return None;
        }
        self.folders.push(path.clone());
        info!("Added folder {}", path);
        Some(path)
    }

    /// Rename the last segment of `target`, moving its whole subtree.
    ///
    /// Returns `None` when the name is not a valid segment or `target` is
    /// the root. A rebased registry entry that collides with another entry
    /// is dropped; entries outside the subtree are left as they are.
    pub fn rename_folder(&mut self, target: &FolderPath, new_name: &str) -> Option<FolderChange> {
        let segment = FolderPath::segment_name(new_name)?;
        if target.is_empty() {
            return None;
        }
        let renamed = target.parent().child(segment);
        let mut change = FolderChange::default();

        let mut folders: Vec<FolderPath> = Vec::with_capacity(self.folders.len());
        for folder in &self.folders {
            match folder.rebase(target, &renamed) {
                Some(rebased) => {
                    change.folders += 1;
                    let collides = folders.contains(&rebased)
                        || self
                            .folders
                            .iter()
                            .any(|f| *f == rebased && !f.starts_with(target));
                    if !collides {
                        folders.push(rebased);
                    }
                }
                None => folders.push(folder.clone()),
            }
        }

        let items = self
            .items
            .iter()
            .map(|item| match item.effective_path().rebase(target, &renamed) {
                Some(rebased) => {
                    change.items += 1;
                    let mut moved = item.clone();
                    moved.set_path(rebased);
                    moved
                }
                None => item.clone(),
            })
            .collect();

        self.folders = folders;
        self.items = items;
        info!(
            "Renamed folder {} to {} ({} folders, {} items)",
            target, renamed, change.folders, change.items
        );
        Some(change)
    }

    /// Delete `target`, its descendant folders and every item under them.
    ///
    /// The root cannot be deleted; passing it is a no-op.
    pub fn delete_folder(&mut self, target: &FolderPath) -> FolderChange {
        if target.is_empty() {
            return FolderChange::default();
        }

        let before = (self.folders.len(), self.items.len());
        let folders: Vec<FolderPath> = self
            .folders
            .iter()
            .filter(|f| !f.starts_with(target))
            .cloned()
            .collect();
        let items: Vec<_> = self
            .items
            .iter()
            .filter(|item| !item.effective_path().starts_with(target))
            .cloned()
            .collect();

        let change = FolderChange {
            folders: before.0 - folders.len(),
            items: before.1 - items.len(),
        };
        self.folders = folders;
        self.items = items;
        info!(
            "Deleted folder {} ({} folders, {} items)",
            target, change.folders, change.items
        );
        change
    }
}
