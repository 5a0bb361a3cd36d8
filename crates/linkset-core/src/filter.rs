//! Item filtering and grouping
//!
//! Filtering runs in two stages: a free-text query, then an optional
//! folder selection. Both are pure projections over the item slice.

use crate::models::LinkItem;
use crate::path::{path_equals, FolderPath, UNFILED};

/// How a selected folder narrows the item list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathScope {
    /// The folder and all of its descendants
    #[default]
    Subtree,
    /// Only items filed exactly at the folder
    ExactLevel,
}

/// True if `query` appears, case-insensitively, in the item's name, URL,
/// any tag or any path segment. A blank query matches everything.
pub fn matches_query(item: &LinkItem, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    matches_needle(item, &needle)
}

fn matches_needle(item: &LinkItem, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle)
        || item.url.to_lowercase().contains(needle)
        || item.tags.iter().any(|t| t.to_lowercase().contains(needle))
        || item
            .path
            .segments()
            .iter()
            .any(|s| s.to_lowercase().contains(needle))
}

/// Items matching a free-text query
pub fn filter_by_query<'a>(items: &'a [LinkItem], query: &str) -> Vec<&'a LinkItem> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|it| matches_needle(it, &needle))
        .collect()
}

/// True if the item's effective path falls inside `selected`
pub fn in_scope(item: &LinkItem, selected: &FolderPath, scope: PathScope) -> bool {
    if selected.is_empty() {
        return true;
    }
    let path = item.effective_path();
    match scope {
        PathScope::ExactLevel => path_equals(path.segments(), selected.segments()),
        PathScope::Subtree => path.starts_with(selected),
    }
}

/// Narrow already-filtered items to a selected folder.
///
/// Selecting the empty path keeps everything regardless of scope.
pub fn filter_by_path<'a>(
    items: Vec<&'a LinkItem>,
    selected: &FolderPath,
    scope: PathScope,
) -> Vec<&'a LinkItem> {
    if selected.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|it| in_scope(it, selected, scope))
        .collect()
}

/// A combined text and folder query
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    pub text: String,
    pub path: FolderPath,
    pub scope: PathScope,
}

impl ItemQuery {
    pub fn apply<'a>(&self, items: &'a [LinkItem]) -> Vec<&'a LinkItem> {
        filter_by_path(filter_by_query(items, &self.text), &self.path, self.scope)
    }
}

/// Group items by their first path segment for display.
///
/// Unfiled items go to the [`UNFILED`] group. Groups keep the order in
/// which their first item was seen, and items keep their relative order.
pub fn group_by_top_folder<'a>(items: &[&'a LinkItem]) -> Vec<(String, Vec<&'a LinkItem>)> {
    let mut groups: Vec<(String, Vec<&'a LinkItem>)> = Vec::new();
    for &item in items {
        let key = item.path.first().unwrap_or(UNFILED);
        match groups.iter_mut().find(|(name, _)| name.as_str() == key) {
            Some((_, members)) => members.push(item),
            None => groups.push((key.to_string(), vec![item])),
        }
    }
    groups
}
