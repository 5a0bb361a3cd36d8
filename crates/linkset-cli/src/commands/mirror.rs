//! Mirror command handlers

use anyhow::{Context, Result};

use linkset_core::storage::DirectoryMirror;
use linkset_core::Store;

use crate::output::Output;

/// Overwrite the remote mirror with every link
pub fn push(store: &Store, output: &Output) -> Result<()> {
    let Some(mirror) = mirror_for(store, output) else {
        return Ok(());
    };
    let count = store
        .push_mirror(&mirror)
        .context("Failed to push to mirror")?;
    output.success(&format!("Pushed {} link(s) to the mirror", count));
    Ok(())
}

/// Merge links from the remote mirror
pub fn pull(store: &mut Store, output: &Output) -> Result<()> {
    let Some(mirror) = mirror_for(store, output) else {
        return Ok(());
    };
    match store
        .pull_mirror(&mirror)
        .context("Failed to pull from mirror")?
    {
        Some(report) => output.print_report("Mirror pull", &report),
        None => output.message("No remote data."),
    }
    Ok(())
}

/// An unconfigured mirror is a notice, not an error
fn mirror_for(store: &Store, output: &Output) -> Option<DirectoryMirror> {
    match DirectoryMirror::from_config(store.config().mirror_dir.as_deref()) {
        Ok(mirror) => Some(mirror),
        Err(e) => {
            output.warning(&e.to_string());
            None
        }
    }
}
