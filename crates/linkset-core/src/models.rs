//! Data models for linkset
//!
//! A [`LinkItem`] is a saved link. Folders have no model of their own:
//! a folder is identified by its [`FolderPath`].

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::path::FolderPath;

/// A saved link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkItem {
    /// Unique identifier, never changes after creation
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// The URL, also the dedup key on import
    pub url: String,
    /// Tags, used for search only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Folder location; empty means unfiled
    #[serde(default, skip_serializing_if = "FolderPath::is_empty")]
    pub path: FolderPath,
    /// When this item was created, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl LinkItem {
    /// Create a new unfiled link named after its URL
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), url)
    }

    /// Create a link with a specific ID
    pub fn with_id(id: Uuid, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id,
            name: url.clone(),
            url,
            tags: Vec::new(),
            path: FolderPath::root(),
            added_at: Some(Utc::now()),
        }
    }

    /// Set the display name; an empty name falls back to the URL
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.name = if name.trim().is_empty() {
            self.url.clone()
        } else {
            name
        };
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn set_path(&mut self, path: FolderPath) {
        self.path = path;
    }

    /// Set all tags (replacing existing)
    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
    }

    /// The stored path, or the unfiled bucket when the item has none
    pub fn effective_path(&self) -> Cow<'_, FolderPath> {
        self.path.effective()
    }
}
