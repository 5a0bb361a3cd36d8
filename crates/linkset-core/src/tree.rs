//! Folder tree derivation
//!
//! The tree is never stored. It is rebuilt from the item paths and the
//! folder registry whenever it is needed, so it always reflects both.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::LinkItem;
use crate::path::FolderPath;

/// A node of the derived folder tree
///
/// The root node has an empty name and stands for "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: BTreeMap::new(),
        }
    }

    /// Walk from this node along `path`, creating missing nodes
    fn ensure(&mut self, path: &FolderPath) {
        let mut node = self;
        for segment in path.segments() {
            node = node
                .children
                .entry(segment.clone())
                .or_insert_with(|| TreeNode::named(segment));
        }
    }

    /// Look up the node at `path` (the root for the empty path)
    pub fn get(&self, path: &FolderPath) -> Option<&TreeNode> {
        let mut node = self;
        for segment in path.segments() {
            node = node.children.get(segment)?;
        }
        Some(node)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Every folder path below this node, depth first, children by name
    pub fn folder_paths(&self) -> Vec<FolderPath> {
        let mut out = Vec::new();
        self.collect_paths(&FolderPath::root(), &mut out);
        out
    }

    fn collect_paths(&self, base: &FolderPath, out: &mut Vec<FolderPath>) {
        for (name, child) in &self.children {
            let path = base.child(name.clone());
            out.push(path.clone());
            child.collect_paths(&path, out);
        }
    }
}

/// Build the folder tree from items and the folder registry.
///
/// Items contribute their effective path, so unfiled items appear under
/// the unfiled bucket. Registry entries that are empty also map to the
/// unfiled bucket. The result depends only on the set of paths.
pub fn build_tree(items: &[LinkItem], folders: &[FolderPath]) -> TreeNode {
    let mut root = TreeNode::default();
    for item in items {
        root.ensure(&item.effective_path());
    }
    for folder in folders {
        root.ensure(&folder.effective());
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::UNFILED;

    fn p(segments: &[&str]) -> FolderPath {
        FolderPath::from(segments)
    }

    fn item_at(path: FolderPath) -> LinkItem {
        let mut item = LinkItem::new("https://example.com");
        item.set_path(path);
        item
    }

    #[test]
    fn test_empty_inputs_give_bare_root() {
        let tree = build_tree(&[], &[]);
        assert!(tree.name.is_empty());
        assert!(tree.is_leaf());
    }

    #[test]
    fn test_items_and_folders_merge_into_one_tree() {
        let items = vec![item_at(p(&["Work", "Frontend"]))];
        let folders = vec![p(&["Work", "Backend"]), p(&["Personal"])];

        let tree = build_tree(&items, &folders);

        assert_eq!(tree.children.len(), 2);
        let work = tree.get(&p(&["Work"])).unwrap();
        assert_eq!(work.name, "Work");
        assert!(work.children.contains_key("Frontend"));
        assert!(work.children.contains_key("Backend"));
        assert!(tree.get(&p(&["Personal"])).unwrap().is_leaf());
    }

    #[test]
    fn test_unfiled_items_land_in_bucket() {
        let items = vec![item_at(FolderPath::root())];
        let tree = build_tree(&items, &[FolderPath::root()]);
        assert_eq!(tree.children.len(), 1);
        assert!(tree.children.contains_key(UNFILED));
    }

    #[test]
    fn test_build_is_order_independent() {
        let paths = [
            p(&["Work", "Frontend", "React"]),
            p(&["Work", "Backend"]),
            p(&["Personal"]),
        ];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

        let expected = build_tree(&[], &paths);
        for order in orders {
            let folders: Vec<_> = order.iter().map(|&i| paths[i].clone()).collect();
            assert_eq!(build_tree(&[], &folders), expected);

            let items: Vec<_> = folders.iter().cloned().map(item_at).collect();
            assert_eq!(build_tree(&items, &[]), expected);
        }
    }

    #[test]
    fn test_duplicate_paths_are_idempotent() {
        let once = build_tree(&[], &[p(&["A", "B"])]);
        let twice = build_tree(&[item_at(p(&["A", "B"]))], &[p(&["A", "B"]), p(&["A"])]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_folder_paths_depth_first() {
        let tree = build_tree(&[], &[p(&["B"]), p(&["A", "Y"]), p(&["A", "X"])]);
        let paths = tree.folder_paths();
        assert_eq!(
            paths,
            vec![p(&["A"]), p(&["A", "X"]), p(&["A", "Y"]), p(&["B"])]
        );
    }

    #[test]
    fn test_get_missing_path() {
        let tree = build_tree(&[], &[p(&["Work"])]);
        assert!(tree.get(&p(&["Work", "Nope"])).is_none());
        assert_eq!(tree.get(&FolderPath::root()), Some(&tree));
    }
}
