//! Export command handler

use std::path::Path;

use anyhow::Result;

use linkset_core::Store;

use crate::output::Output;

/// Write every link as pretty-printed JSON, to a file or to stdout ("-")
pub fn export(store: &Store, target: &Path, output: &Output) -> Result<()> {
    if target == Path::new("-") {
        println!("{}", store.export_json()?);
        return Ok(());
    }

    store.export_to(target)?;
    output.success(&format!(
        "Exported {} link(s) to {}",
        store.items().len(),
        target.display()
    ));
    Ok(())
}
