//! Browser bookmark tree import
//!
//! The host hands us a tree of nodes. Nodes with a URL are bookmarks;
//! nodes with children are containers whose non-empty title becomes a path
//! segment for everything below them.
//!
//! [`ChromiumBookmarks`] reads the `Bookmarks` JSON file that Chromium
//! based browsers keep in the profile directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{web_candidate, ImportError};
use crate::models::LinkItem;
use crate::path::FolderPath;

/// One node of the host bookmark tree
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmarkNode {
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub children: Vec<BookmarkNode>,
}

impl BookmarkNode {
    pub fn folder(title: impl Into<String>, children: Vec<BookmarkNode>) -> Self {
        Self {
            title: title.into(),
            url: None,
            children,
        }
    }

    pub fn bookmark(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: Some(url.into()),
            children: Vec::new(),
        }
    }
}

/// Something that can hand over the host's bookmark tree
pub trait BookmarkSource {
    /// The top-level nodes, i.e. the children of the unnamed root
    fn bookmark_tree(&self) -> Result<Vec<BookmarkNode>, ImportError>;
}

/// Walk the tree and collect every web bookmark as a candidate item
pub fn collect_bookmarks(nodes: &[BookmarkNode]) -> Vec<LinkItem> {
    let mut items = Vec::new();
    walk(nodes, &FolderPath::root(), &mut items);
    items
}

fn walk(nodes: &[BookmarkNode], path: &FolderPath, out: &mut Vec<LinkItem>) {
    for node in nodes {
        if let Some(url) = &node.url {
            if let Some(item) = web_candidate(&node.title, url, path.clone()) {
                out.push(item);
            }
        }
        if !node.children.is_empty() {
            let next = if node.title.is_empty() {
                path.clone()
            } else {
                path.child(node.title.clone())
            };
            walk(&node.children, &next, out);
        }
    }
}

/// Root keys of the Chromium `Bookmarks` file, in display order
const CHROMIUM_ROOTS: [&str; 3] = ["bookmark_bar", "other", "synced"];

/// The `Bookmarks` file of a Chromium profile
pub struct ChromiumBookmarks {
    path: PathBuf,
}

impl ChromiumBookmarks {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use the configured file, or probe the usual profile locations
    pub fn locate(configured: Option<&Path>) -> Option<Self> {
        if let Some(path) = configured {
            return Some(Self::new(path));
        }
        default_locations()
            .into_iter()
            .find(|p| p.exists())
            .map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BookmarkSource for ChromiumBookmarks {
    fn bookmark_tree(&self) -> Result<Vec<BookmarkNode>, ImportError> {
        if !self.path.exists() {
            return Err(ImportError::Unavailable(format!(
                "Browser bookmarks not found at '{}'. Use an HTML bookmark export instead.",
                self.path.display()
            )));
        }
        let content = fs::read_to_string(&self.path).map_err(|source| ImportError::Read {
            path: self.path.clone(),
            source,
        })?;
        let doc: Value = serde_json::from_str(&content).map_err(|e| ImportError::Malformed {
            path: self.path.clone(),
            details: e.to_string(),
        })?;

        let Some(roots) = doc.get("roots").and_then(Value::as_object) else {
            return Err(ImportError::Malformed {
                path: self.path.clone(),
                details: "missing 'roots' object".to_string(),
            });
        };

        let mut nodes = Vec::new();
        for key in CHROMIUM_ROOTS {
            let Some(value) = roots.get(key) else {
                continue;
            };
            match BookmarkNode::deserialize(value) {
                Ok(node) => nodes.push(node),
                Err(e) => warn!("Skipping bookmark root '{}': {}", key, e),
            }
        }
        debug!("Read {} bookmark roots from {:?}", nodes.len(), self.path);
        Ok(nodes)
    }
}

/// Usual `Bookmarks` locations for Chrome and Chromium on this platform
fn default_locations() -> Vec<PathBuf> {
    let mut out = Vec::new();
    if cfg!(target_os = "windows") {
        if let Some(base) = dirs::data_local_dir() {
            out.push(base.join("Google/Chrome/User Data/Default/Bookmarks"));
            out.push(base.join("Chromium/User Data/Default/Bookmarks"));
        }
    } else if cfg!(target_os = "macos") {
        if let Some(base) = dirs::config_dir() {
            out.push(base.join("Google/Chrome/Default/Bookmarks"));
            out.push(base.join("Chromium/Default/Bookmarks"));
        }
    } else if let Some(base) = dirs::config_dir() {
        out.push(base.join("google-chrome/Default/Bookmarks"));
        out.push(base.join("chromium/Default/Bookmarks"));
    }
    out
}
