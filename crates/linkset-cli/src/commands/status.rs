//! Status command handler

use anyhow::Result;

use linkset_core::storage::MIRROR_FILE;
use linkset_core::Store;

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let config = store.config();
    let library = store.library();
    let mirror_file = config.mirror_dir.as_ref().map(|dir| dir.join(MIRROR_FILE));

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "counts": {
                        "links": library.item_count(),
                        "folders": library.folder_count(),
                        "tree_folders": store.tree().folder_paths().len()
                    },
                    "storage": {
                        "data_dir": config.data_dir,
                        "links_file": config.items_path(),
                        "folders_file": config.folders_path()
                    },
                    "mirror": {
                        "available": mirror_file.is_some(),
                        "file": mirror_file
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", library.item_count());
        }
        OutputFormat::Human => {
            println!("linkset Status");
            println!("==============");
            println!();
            println!("Contents:");
            println!("  Links:   {}", library.item_count());
            println!(
                "  Folders: {} ({} registered)",
                store.tree().folder_paths().len(),
                library.folder_count()
            );
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!();
            println!("Mirror:");
            match &mirror_file {
                Some(file) => println!("  File: {}", file.display()),
                None => println!("  Not configured"),
            }
        }
    }

    Ok(())
}
