//! Session state and persistence
//!
//! The `Store` owns the in-memory [`Library`] for one session. Every
//! mutation is applied to memory first and then written out as a full
//! snapshot. A failed write never rolls the memory state back; it is
//! logged and kept as a pending warning for the caller to show once.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open_with_config(Config::load()?)?;  // Drains the inbox
//!
//! store.add_item(LinkItem::new("https://example.com/"));
//! if let Some(warning) = store.take_save_warning() {
//!     eprintln!("{warning}");
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::filter::ItemQuery;
use crate::folders::FolderChange;
use crate::import::{
    collect_bookmarks, merge, parse_bookmarks_html, parse_json_import, parse_stored_entries,
    BookmarkSource, ImportError, MergeReport,
};
use crate::library::Library;
use crate::models::LinkItem;
use crate::path::FolderPath;
use crate::storage::{
    CaptureInbox, FolderRegistry, ItemStore, JsonPersistence, MirrorError, RemoteMirror,
    StorageError, StorageResult,
};
use crate::tree::TreeNode;

/// One session over the stored library
pub struct Store {
    library: Library,
    persistence: JsonPersistence,
    config: Config,
    /// Set by a failed write, cleared by `take_save_warning`
    save_warning: Option<String>,
    inbox_drained: bool,
}

impl Store {
    /// Open the store with a specific configuration
    ///
    /// Loads the item snapshot and the folder registry, then merges
    /// anything waiting in the capture inbox.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let persistence = JsonPersistence::new(config.clone());

        let items = recover_corrupt(persistence.load_items()).context("Failed to load items")?;
        let folders =
            recover_corrupt(persistence.load_folders()).context("Failed to load folders")?;
        debug!("Loaded {} items and {} folders", items.len(), folders.len());

        let mut store = Self {
            library: Library::new(items, folders),
            persistence,
            config,
            save_warning: None,
            inbox_drained: false,
        };
        store.drain_inbox();
        Ok(store)
    }

    /// Queue a captured link without opening the library.
    ///
    /// The next session merges it on open.
    pub fn capture(config: &Config, item: &LinkItem) -> Result<()> {
        JsonPersistence::new(config.clone())
            .append_inbox(item)
            .context("Failed to write capture inbox")
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Warning left by the last failed write, returned only once
    pub fn take_save_warning(&mut self) -> Option<String> {
        self.save_warning.take()
    }

    // ==================== Capture Inbox ====================

    /// Merge the capture inbox into the library.
    ///
    /// Runs at most once per session; later calls return `None`. The inbox
    /// is cleared afterwards even if every entry was already present.
    pub fn drain_inbox(&mut self) -> Option<MergeReport> {
        if self.inbox_drained {
            return None;
        }
        self.inbox_drained = true;

        let entries = match self.persistence.read_inbox() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not read capture inbox: {}", e);
                return None;
            }
        };
        if entries.is_empty() {
            return Some(MergeReport::default());
        }

        let report = self.merge_candidates(parse_stored_entries(&entries));
        info!(
            "Drained capture inbox: {} added, {} skipped",
            report.added, report.skipped
        );
        if let Err(e) = self.persistence.clear_inbox() {
            warn!("Could not clear capture inbox: {}", e);
        }
        Some(report)
    }

    // ==================== Items ====================

    /// Add an item at the front. URL uniqueness is not enforced.
    pub fn add_item(&mut self, item: LinkItem) {
        self.library.add_item(item);
        self.save_items();
    }

    /// Replace the item with the same id; false if there is none
    pub fn update_item(&mut self, item: LinkItem) -> bool {
        let updated = self.library.update_item(item);
        if updated {
            self.save_items();
        }
        updated
    }

    pub fn delete_item(&mut self, id: Uuid) -> Option<LinkItem> {
        let removed = self.library.remove_item(id);
        if removed.is_some() {
            self.save_items();
        }
        removed
    }

    pub fn get_item(&self, id: Uuid) -> Option<&LinkItem> {
        self.library.get_item(id)
    }

    /// Resolve a full id or a unique id prefix
    pub fn resolve_item(&self, id_or_prefix: &str) -> Result<&LinkItem> {
        if let Ok(id) = Uuid::parse_str(id_or_prefix) {
            return self
                .get_item(id)
                .with_context(|| format!("No link with id {}", id));
        }
        match self.library.find_by_id_prefix(id_or_prefix).as_slice() {
            [item] => Ok(*item),
            [] => anyhow::bail!("No link matches id prefix '{}'", id_or_prefix),
            many => anyhow::bail!(
                "Id prefix '{}' is ambiguous ({} links match)",
                id_or_prefix,
                many.len()
            ),
        }
    }

    pub fn items(&self) -> &[LinkItem] {
        &self.library.items
    }

    pub fn query(&self, query: &ItemQuery) -> Vec<&LinkItem> {
        query.apply(&self.library.items)
    }

    // ==================== Folders ====================

    pub fn folders(&self) -> &[FolderPath] {
        &self.library.folders
    }

    pub fn tree(&self) -> TreeNode {
        self.library.tree()
    }

    /// Register a folder under `parent`
    pub fn add_folder(&mut self, parent: &FolderPath, name: &str) -> Option<FolderPath> {
        let added = self.library.add_folder(parent, name)?;
        self.save_folders();
        Some(added)
    }

    /// Rename a folder; both collections are saved when anything moved
    pub fn rename_folder(&mut self, target: &FolderPath, new_name: &str) -> Option<FolderChange> {
        let change = self.library.rename_folder(target, new_name)?;
        self.save_change(change);
        Some(change)
    }

    /// Delete a folder with its whole subtree and the items inside it
    pub fn delete_folder(&mut self, target: &FolderPath) -> FolderChange {
        let change = self.library.delete_folder(target);
        self.save_change(change);
        change
    }

    // ==================== Import / Export ====================

    pub fn import_html(&mut self, html: &str) -> MergeReport {
        self.merge_candidates(parse_bookmarks_html(html))
    }

    pub fn import_json(&mut self, text: &str) -> MergeReport {
        self.merge_candidates(parse_json_import(text))
    }

    /// Import the host's bookmark tree.
    ///
    /// A source that is not available leaves the library untouched.
    pub fn import_bookmarks(
        &mut self,
        source: &dyn BookmarkSource,
    ) -> Result<MergeReport, ImportError> {
        let nodes = source.bookmark_tree()?;
        Ok(self.merge_candidates(collect_bookmarks(&nodes)))
    }

    /// All items as pretty-printed JSON
    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.library.items).context("Failed to encode items")
    }

    pub fn export_to(&self, path: &Path) -> Result<()> {
        let json = self.export_json()?;
        fs::write(path, json).with_context(|| format!("Failed to write export file: {:?}", path))
    }

    // ==================== Remote Mirror ====================

    /// Overwrite the remote copy with every item
    pub fn push_mirror(&self, mirror: &dyn RemoteMirror) -> Result<usize, MirrorError> {
        mirror.push(&self.library.items)?;
        Ok(self.library.items.len())
    }

    /// Merge the remote copy; `None` when the remote holds nothing
    pub fn pull_mirror(
        &mut self,
        mirror: &dyn RemoteMirror,
    ) -> Result<Option<MergeReport>, MirrorError> {
        let Some(entries) = mirror.pull()? else {
            return Ok(None);
        };
        Ok(Some(self.merge_candidates(parse_stored_entries(&entries))))
    }

    // ==================== Persistence ====================

    fn merge_candidates(&mut self, candidates: Vec<LinkItem>) -> MergeReport {
        let report = merge(&mut self.library.items, candidates);
        debug!("Merged: {} added, {} skipped", report.added, report.skipped);
        if report.added > 0 {
            self.save_items();
        }
        report
    }

    fn save_change(&mut self, change: FolderChange) {
        if change.folders > 0 {
            self.save_folders();
        }
        if change.items > 0 {
            self.save_items();
        }
    }

    fn save_items(&mut self) {
        let result = self.persistence.replace_items(&self.library.items);
        self.record(result);
    }

    fn save_folders(&mut self) {
        let result = self.persistence.replace_folders(&self.library.folders);
        self.record(result);
    }

    fn record(&mut self, result: StorageResult<()>) {
        if let Err(e) = result {
            warn!("Save failed: {}", e);
            let hint = e.recovery_suggestion().unwrap_or(
                "Your changes are kept for this session only. Export your links to JSON as a backup.",
            );
            self.save_warning = Some(format!("Could not save: {}. {}", e, hint));
        }
    }
}

/// A corrupt snapshot has already been moved aside; start from empty
fn recover_corrupt<T: Default>(result: StorageResult<T>) -> StorageResult<T> {
    match result {
        Err(StorageError::CorruptDocument {
            path, backup_path, ..
        }) => {
            warn!(
                "Starting with an empty collection; {:?} was backed up to {:?}",
                path, backup_path
            );
            Ok(T::default())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::PathScope;
    use crate::import::BookmarkNode;
    use crate::storage::DirectoryMirror;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().join("data"),
            ..Config::default()
        }
    }

    fn link(url: &str, path: &str) -> LinkItem {
        let mut item = LinkItem::new(url);
        item.set_path(FolderPath::parse(path));
        item
    }

    struct NoBookmarks;

    impl BookmarkSource for NoBookmarks {
        fn bookmark_tree(&self) -> Result<Vec<BookmarkNode>, ImportError> {
            Err(ImportError::Unavailable("no bookmarks here".to_string()))
        }
    }

    struct FixedBookmarks(Vec<BookmarkNode>);

    impl BookmarkSource for FixedBookmarks {
        fn bookmark_tree(&self) -> Result<Vec<BookmarkNode>, ImportError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_open_creates_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        assert!(store.items().is_empty());
        assert!(store.folders().is_empty());
        assert!(store.take_save_warning().is_none());
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            store.add_item(link("https://a.com/", "Work"));
            store.add_folder(&FolderPath::root(), "Empty");
        }

        let store = Store::open_with_config(config).unwrap();
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].path, FolderPath::parse("Work"));
        assert_eq!(store.folders(), &[FolderPath::parse("Empty")]);
    }

    #[test]
    fn test_add_update_delete_item() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        let item = link("https://a.com/", "");
        let id = item.id;
        store.add_item(item);
        // Manual adds do not deduplicate
        store.add_item(link("https://a.com/", ""));
        assert_eq!(store.items().len(), 2);
        assert_eq!(store.items()[1].id, id);

        let mut edited = store.get_item(id).unwrap().clone();
        edited.set_name("Renamed");
        assert!(store.update_item(edited));
        assert_eq!(store.get_item(id).unwrap().name, "Renamed");

        assert!(store.delete_item(id).is_some());
        assert!(store.get_item(id).is_none());
        assert!(store.delete_item(id).is_none());
        assert!(!store.update_item(LinkItem::new("https://ghost.com/")));
    }

    #[test]
    fn test_resolve_item_by_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        let item = LinkItem::with_id(
            Uuid::parse_str("0a1b2c3d-0000-4000-8000-000000000000").unwrap(),
            "https://a.com/",
        );
        store.add_item(item);
        store.add_item(LinkItem::with_id(
            Uuid::parse_str("0a1b9999-0000-4000-8000-000000000000").unwrap(),
            "https://b.com/",
        ));

        assert_eq!(store.resolve_item("0a1b2c").unwrap().url, "https://a.com/");
        assert!(store.resolve_item("0a1b").is_err());
        assert!(store.resolve_item("ffff").is_err());
        assert_eq!(
            store
                .resolve_item("0a1b9999-0000-4000-8000-000000000000")
                .unwrap()
                .url,
            "https://b.com/"
        );
    }

    #[test]
    fn test_folder_operations_persist() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            store.add_folder(&FolderPath::root(), "Work");
            store.add_folder(&FolderPath::parse("Work"), "Frontend");
            store.add_item(link("https://react.dev/", "Work/Frontend"));
            store.add_item(link("https://news.com/", "News"));

            let change = store
                .rename_folder(&FolderPath::parse("Work"), "Job")
                .unwrap();
            assert_eq!(change, FolderChange { folders: 2, items: 1 });
        }

        let mut store = Store::open_with_config(config.clone()).unwrap();
        assert_eq!(
            store.folders(),
            &[FolderPath::parse("Job"), FolderPath::parse("Job/Frontend")]
        );
        assert_eq!(store.items()[1].path, FolderPath::parse("Job/Frontend"));

        let change = store.delete_folder(&FolderPath::parse("Job"));
        assert_eq!(change, FolderChange { folders: 2, items: 1 });
        drop(store);

        let store = Store::open_with_config(config).unwrap();
        assert!(store.folders().is_empty());
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].url, "https://news.com/");
    }

    #[test]
    fn test_folder_names_match_after_reload() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            store.add_folder(&FolderPath::root(), "Work");
            store.add_item(link("https://a.com/", "Work"));

            assert!(store.rename_folder(&FolderPath::parse("Work"), "Job/2024").is_none());
            assert!(store.add_folder(&FolderPath::root(), "Job/2024").is_none());
            store.rename_folder(&FolderPath::parse("Work"), "Job 2024").unwrap();
        }

        let store = Store::open_with_config(config).unwrap();
        let renamed = FolderPath::new(["Job 2024"]);
        assert_eq!(store.folders(), &[renamed.clone()]);
        assert_eq!(store.items()[0].path, renamed);
        assert_eq!(store.tree().folder_paths(), vec![renamed]);
    }

    #[test]
    fn test_query_and_tree() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();
        store.add_item(link("https://react.dev/", "Work/Frontend"));
        store.add_item(link("https://intranet.com/", "Work"));
        store.add_item(link("https://loose.com/", ""));

        let query = ItemQuery {
            text: String::new(),
            path: FolderPath::parse("Work"),
            scope: PathScope::ExactLevel,
        };
        let hits = store.query(&query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://intranet.com/");

        let tree = store.tree();
        assert!(tree.get(&FolderPath::parse("Work/Frontend")).is_some());
        assert!(tree.get(&FolderPath::unfiled()).is_some());
    }

    #[test]
    fn test_inbox_drained_once_on_open() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            store.add_item(LinkItem::new("https://a.com/"));
        }

        Store::capture(&config, &LinkItem::new("https://a.com/")).unwrap();
        Store::capture(&config, &LinkItem::new("https://b.com/")).unwrap();

        let mut store = Store::open_with_config(config.clone()).unwrap();
        let urls: Vec<_> = store.items().iter().map(|it| it.url.as_str()).collect();
        assert_eq!(urls, vec!["https://b.com/", "https://a.com/"]);
        assert!(store.drain_inbox().is_none());

        // Inbox was cleared
        let persistence = JsonPersistence::new(config);
        assert!(persistence.read_inbox().unwrap().is_empty());
    }

    #[test]
    fn test_inbox_cleared_when_all_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            store.add_item(LinkItem::new("https://a.com/"));
        }
        Store::capture(&config, &LinkItem::new("https://a.com/")).unwrap();

        let store = Store::open_with_config(config.clone()).unwrap();
        assert_eq!(store.items().len(), 1);
        assert!(JsonPersistence::new(config).read_inbox().unwrap().is_empty());
    }

    #[test]
    fn test_import_html_and_json() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();
        store.add_item(LinkItem::new("https://b.com/"));

        let html = r#"<DL><p>
            <DT><H3>Dev</H3>
            <DL><p><DT><A HREF="https://b.com/">B</A><DT><A HREF="https://c.com">C</A></DL><p>
        </DL>"#;
        let report = store.import_html(html);
        assert_eq!(report, MergeReport { added: 1, skipped: 1 });
        assert_eq!(store.items()[0].path, FolderPath::parse("Dev"));

        let report = store.import_json(r#"[{"url": "https://c.com/"}, {"url": "https://d.com"}]"#);
        assert_eq!(report, MergeReport { added: 1, skipped: 1 });
        assert_eq!(store.items().len(), 3);

        // Malformed document changes nothing
        assert_eq!(store.import_json("{oops"), MergeReport::default());
    }

    #[test]
    fn test_import_bookmarks() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        assert!(matches!(
            store.import_bookmarks(&NoBookmarks),
            Err(ImportError::Unavailable(_))
        ));
        assert!(store.items().is_empty());

        let source = FixedBookmarks(vec![BookmarkNode::folder(
            "Bar",
            vec![BookmarkNode::bookmark("Docs", "https://docs.rs")],
        )]);
        let report = store.import_bookmarks(&source).unwrap();
        assert_eq!(report.added, 1);
        assert_eq!(store.import_bookmarks(&source).unwrap().added, 0);
    }

    #[test]
    fn test_export_json() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();
        store.add_item(link("https://a.com/", "Work"));

        let path = temp_dir.path().join("linkset.json");
        store.export_to(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  {"));

        // An export imports back without duplicates
        assert_eq!(store.import_json(&text).added, 0);
    }

    #[test]
    fn test_mirror_push_and_pull() {
        let temp_dir = TempDir::new().unwrap();
        let mirror = DirectoryMirror::new(temp_dir.path().join("mirror"));

        let mut first = Store::open_with_config(Config {
            data_dir: temp_dir.path().join("one"),
            ..Config::default()
        })
        .unwrap();
        assert!(first.pull_mirror(&mirror).unwrap().is_none());

        let item = link("https://a.com/", "Work");
        let id = item.id;
        first.add_item(item);
        assert_eq!(first.push_mirror(&mirror).unwrap(), 1);

        let mut second = Store::open_with_config(Config {
            data_dir: temp_dir.path().join("two"),
            ..Config::default()
        })
        .unwrap();
        second.add_item(LinkItem::new("https://local.com/"));
        let report = second.pull_mirror(&mirror).unwrap().unwrap();
        assert_eq!(report.added, 1);
        assert_eq!(second.items()[0].id, id);
        assert_eq!(second.items()[0].path, FolderPath::parse("Work"));
    }

    #[test]
    fn test_pull_of_corrupt_mirror_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mirror = DirectoryMirror::new(temp_dir.path().join("mirror"));
        fs::create_dir_all(temp_dir.path().join("mirror")).unwrap();
        fs::write(mirror.file_path(), "[{").unwrap();

        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();
        store.add_item(LinkItem::new("https://local.com/"));

        assert!(matches!(
            store.pull_mirror(&mirror),
            Err(MirrorError::Malformed { .. })
        ));
        assert!(mirror.file_path().exists());
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn test_failed_save_keeps_memory_and_warns_once() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let mut store = Store::open_with_config(Config {
            data_dir: blocker,
            ..Config::default()
        })
        .unwrap();

        store.add_item(LinkItem::new("https://a.com/"));
        assert_eq!(store.items().len(), 1);

        let warning = store.take_save_warning().unwrap();
        assert!(warning.contains("Could not save"));
        assert!(store.take_save_warning().is_none());
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        fs::create_dir_all(&config.data_dir).unwrap();
        fs::write(config.items_path(), "not json").unwrap();

        let store = Store::open_with_config(config.clone()).unwrap();
        assert!(store.items().is_empty());
        assert!(config.data_dir.join("links.json.corrupt.backup").exists());
    }
}
