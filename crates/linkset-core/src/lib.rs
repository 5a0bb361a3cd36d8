//! linkset core library
//!
//! This crate provides the core functionality for linkset, a local bookmark
//! manager that files links into a folder hierarchy and imports from
//! browsers without creating duplicates.
//!
//! # Data model
//!
//! Items are stored flat. Each carries its folder as a path of segments;
//! the folder tree is derived on demand from item paths plus a registry of
//! explicitly created (possibly empty) folders. Items without a path live
//! in the `Unfiled` bucket.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open_with_config(Config::load()?)?;
//!
//! let mut item = LinkItem::new("https://example.com/");
//! item.set_path(FolderPath::parse("Work/Docs"));
//! store.add_item(item);
//!
//! store.rename_folder(&FolderPath::parse("Work"), "Job");
//! let tree = store.tree();
//! ```
//!
//! # Modules
//!
//! - `store`: session object (main entry point)
//! - `path`: folder paths and prefix matching
//! - `models`: the `LinkItem` record
//! - `tree`: derived folder tree
//! - `library`: items plus folder registry, in memory
//! - `folders`: add / rename / delete folder cascades
//! - `filter`: text and folder filters, grouping
//! - `import`: HTML, JSON and browser bookmark import with URL dedup
//! - `storage`: JSON snapshot files, capture inbox, remote mirror
//! - `config`: application configuration

pub mod config;
pub mod filter;
pub mod folders;
pub mod import;
pub mod library;
pub mod models;
pub mod path;
pub mod storage;
pub mod store;
pub mod tree;

pub use config::Config;
pub use filter::{ItemQuery, PathScope};
pub use folders::FolderChange;
pub use import::{ImportError, MergeReport};
pub use library::Library;
pub use models::LinkItem;
pub use path::FolderPath;
pub use storage::{MirrorError, StorageError};
pub use store::Store;
pub use tree::TreeNode;
