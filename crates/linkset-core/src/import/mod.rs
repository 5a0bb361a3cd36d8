//! Import and merge
//!
//! Three adapters turn outside data into candidate items:
//!
//! - [`html`]: Netscape bookmark files exported by browsers
//! - [`native`]: the browser's own bookmark tree
//! - [`json`]: a flat JSON array, such as a previous export
//!
//! Every adapter normalizes URLs and keeps only `http`/`https` links.
//! Candidates from any source, including the capture inbox and the remote
//! mirror, then go through the same [`merge`] policy: skip URLs that are
//! already present and prepend the rest.

pub mod html;
pub mod json;
pub mod native;

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::LinkItem;
use crate::path::FolderPath;

pub use html::parse_bookmarks_html;
pub use json::{parse_json_import, parse_stored_entries};
pub use native::{collect_bookmarks, BookmarkNode, BookmarkSource, ChromiumBookmarks};

/// Errors that stop an import before any candidate is produced
///
/// Malformed individual entries are never errors; they are skipped.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The host does not offer this source
    #[error("{0}")]
    Unavailable(String),

    /// The source exists but could not be read
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source could not be parsed at all
    #[error("Could not parse '{path}': {details}")]
    Malformed { path: PathBuf, details: String },
}

/// Outcome of merging a candidate list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Candidates that became new items
    pub added: usize,
    /// Candidates dropped because their URL was already present
    pub skipped: usize,
}

/// Parse and re-serialize a URL. Unparsable input is returned unchanged.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => url.to_string(),
        Err(_) => raw.to_string(),
    }
}

/// True if the URL parses with an `http` or `https` scheme
pub fn is_web_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Build a fresh candidate item from an outside link.
///
/// Returns `None` unless the normalized URL is `http` or `https`. A blank
/// name falls back to the normalized URL.
pub fn web_candidate(name: &str, href: &str, path: FolderPath) -> Option<LinkItem> {
    let url = normalize_url(href);
    if !is_web_url(&url) {
        debug!("Skipping non-web link {:?}", href);
        return None;
    }
    let mut item = LinkItem::new(url);
    item.set_name(name.trim());
    item.set_path(path);
    Some(item)
}

/// Keep only candidates whose URL is not already present.
///
/// Later duplicates inside `candidates` are dropped too, so the result
/// never holds two items with the same URL.
pub fn dedup_candidates(existing: &[LinkItem], candidates: Vec<LinkItem>) -> Vec<LinkItem> {
    let mut seen: HashSet<String> = existing.iter().map(|it| it.url.clone()).collect();
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.url.clone()))
        .collect()
}

/// Prepend the candidates whose URL is new; never touches existing items
pub fn merge(existing: &mut Vec<LinkItem>, candidates: Vec<LinkItem>) -> MergeReport {
    let offered = candidates.len();
    let mut fresh = dedup_candidates(existing, candidates);
    let report = MergeReport {
        added: fresh.len(),
        skipped: offered - fresh.len(),
    };
    fresh.append(existing);
    *existing = fresh;
    report
}
