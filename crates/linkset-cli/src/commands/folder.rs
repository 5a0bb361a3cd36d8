//! Folder command handlers

use anyhow::{bail, Result};

use linkset_core::{FolderPath, Store};

use crate::editor::confirm;
use crate::output::Output;

/// Show the derived folder tree
pub fn tree(store: &Store, output: &Output) -> Result<()> {
    output.print_tree(&store.tree());
    Ok(())
}

/// Create a folder, optionally below an existing path
pub fn add(store: &mut Store, name: String, parent: Option<String>, output: &Output) -> Result<()> {
    let parent = parent.as_deref().map(FolderPath::parse).unwrap_or_default();
    let segment = folder_name(&name)?;

    match store.add_folder(&parent, segment) {
        Some(path) => output.success(&format!("Created folder {}", path)),
        None => output.message(&format!("Folder {} already exists", parent.child(segment))),
    }
    Ok(())
}

/// Rename the last segment of a folder
pub fn rename(store: &mut Store, path: String, new_name: String, output: &Output) -> Result<()> {
    let target = parse_target(&path)?;
    let segment = folder_name(&new_name)?;

    let Some(change) = store.rename_folder(&target, segment) else {
        bail!("Cannot rename the top level");
    };

    if change.is_empty() {
        output.message(&format!("No folder or link under {}", target));
    } else {
        output.success(&format!(
            "Renamed {} to {} ({} folder(s), {} link(s) moved)",
            target,
            target.parent().child(segment),
            change.folders,
            change.items
        ));
    }
    Ok(())
}

/// Delete a folder, its subfolders and every link inside them
pub fn delete(store: &mut Store, path: String, yes: bool, output: &Output) -> Result<()> {
    let target = parse_target(&path)?;

    if !yes && output.should_prompt() {
        let doomed = store
            .items()
            .iter()
            .filter(|item| item.effective_path().starts_with(&target))
            .count();
        println!(
            "Delete folder {} with its subfolders and {} link(s)?",
            target, doomed
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let change = store.delete_folder(&target);
    if change.is_empty() {
        output.message(&format!("No folder or link under {}", target));
    } else {
        output.success(&format!(
            "Deleted {} ({} folder(s), {} link(s))",
            target, change.folders, change.items
        ));
    }
    Ok(())
}

/// A single folder name; nesting is given with `--parent` instead
fn folder_name(name: &str) -> Result<&str> {
    match FolderPath::segment_name(name) {
        Some(segment) => Ok(segment),
        None if name.trim().is_empty() => bail!("Folder name must not be empty"),
        None => bail!("Folder name must not contain '/'"),
    }
}

/// The top level cannot be renamed or deleted
fn parse_target(path: &str) -> Result<FolderPath> {
    let target = FolderPath::parse(path);
    if target.is_empty() {
        bail!("Give a folder path such as Work/Frontend");
    }
    Ok(target)
}
