//! Import command handlers

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use linkset_core::import::{BookmarkSource, ChromiumBookmarks, ImportError};
use linkset_core::Store;

use crate::output::Output;

/// Import a Netscape bookmark file
pub fn html(store: &mut Store, file: &Path, output: &Output) -> Result<()> {
    let content = read(file)?;
    let report = store.import_html(&content);
    output.print_report("HTML import", &report);
    Ok(())
}

/// Import a JSON array of links
pub fn json(store: &mut Store, file: &Path, output: &Output) -> Result<()> {
    let content = read(file)?;
    let report = store.import_json(&content);
    output.print_report("JSON import", &report);
    Ok(())
}

/// Import the browser's bookmark tree
///
/// A browser without a bookmark file is a notice, not an error.
pub fn bookmarks(store: &mut Store, file: Option<PathBuf>, output: &Output) -> Result<()> {
    let configured = file.or_else(|| store.config().bookmarks_file.clone());
    let Some(source) = ChromiumBookmarks::locate(configured.as_deref()) else {
        output.warning(
            "No browser bookmarks found. Pass --file, set bookmarks_file, or import an HTML export.",
        );
        return Ok(());
    };

    import_from(store, &source, output)
}

fn import_from(store: &mut Store, source: &dyn BookmarkSource, output: &Output) -> Result<()> {
    match store.import_bookmarks(source) {
        Ok(report) if report.added == 0 && report.skipped == 0 => {
            output.message("No http links found in bookmarks.");
            Ok(())
        }
        Ok(report) => {
            output.print_report("Bookmark import", &report);
            Ok(())
        }
        Err(ImportError::Unavailable(notice)) => {
            output.warning(&notice);
            Ok(())
        }
        Err(e) => Err(e).context("Failed to import bookmarks"),
    }
}

fn read(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))
}
