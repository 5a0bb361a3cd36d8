//! Link command handlers

use anyhow::{bail, Context, Result};

use linkset_core::{FolderPath, ItemQuery, LinkItem, PathScope, Store};

use crate::editor::{confirm, prompt_with_default};
use crate::metadata::fetch_title;
use crate::output::Output;

/// Fields given on the command line for `link edit`
#[derive(Debug, Default)]
pub struct LinkEdit {
    pub name: Option<String>,
    pub url: Option<String>,
    pub path: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl LinkEdit {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.url.is_none() && self.path.is_none() && self.tags.is_none()
    }

    fn apply(self, item: &mut LinkItem) {
        if let Some(url) = self.url {
            item.set_url(url.trim());
        }
        if let Some(name) = self.name {
            item.set_name(name.trim());
        }
        if let Some(path) = self.path {
            item.set_path(FolderPath::parse(&path));
        }
        if let Some(tags) = self.tags {
            item.set_tags(split_tags(&tags));
        }
    }
}

/// Add a new link
///
/// Adding never checks for an existing link with the same URL.
pub async fn add(
    store: &mut Store,
    url: String,
    name: Option<String>,
    path: Option<String>,
    tags: Vec<String>,
    output: &Output,
) -> Result<()> {
    let url = url.trim().to_string();
    if url.is_empty() {
        bail!("URL must not be empty");
    }

    let name = match name.filter(|n| !n.trim().is_empty()) {
        Some(name) => Some(name),
        None => fetch_title(&url).await,
    };

    let mut item = LinkItem::new(url);
    if let Some(name) = name {
        item.set_name(name.trim());
    }
    if let Some(path) = path {
        item.set_path(FolderPath::parse(&path));
    }
    item.set_tags(split_tags(&tags));

    output.success(&format!("Added link: {}", item.id));
    output.print_item(&item);
    store.add_item(item);

    Ok(())
}

/// List links, optionally filtered by text and folder
pub fn list(
    store: &Store,
    query: Option<String>,
    path: Option<String>,
    level_only: bool,
    output: &Output,
) -> Result<()> {
    let query = ItemQuery {
        text: query.unwrap_or_default(),
        path: path.as_deref().map(FolderPath::parse).unwrap_or_default(),
        scope: if level_only {
            PathScope::ExactLevel
        } else {
            PathScope::Subtree
        },
    };
    let items = store.query(&query);

    if query.path.is_empty() {
        output.print_grouped(&items);
    } else {
        output.print_items(&items);
    }
    Ok(())
}

/// Show a single link
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let item = store.resolve_item(&id)?;
    output.print_item(item);
    Ok(())
}

/// Open a link in the default browser
pub fn open(store: &Store, id: String, output: &Output) -> Result<()> {
    let item = store.resolve_item(&id)?;
    open::that(&item.url).with_context(|| format!("Failed to open {}", item.url))?;
    output.message(&format!("Opened {}", item.url));
    Ok(())
}

/// Edit a link
///
/// Without any field flags, prompts for each field interactively.
pub fn edit(store: &mut Store, id: String, changes: LinkEdit, output: &Output) -> Result<()> {
    let mut item = store.resolve_item(&id)?.clone();

    if changes.is_empty() {
        prompt_edit(&mut item)?;
    } else {
        changes.apply(&mut item);
    }

    if !store.update_item(item.clone()) {
        bail!("Link not found: {}", id);
    }

    output.success("Link updated");
    output.print_item(&item);
    Ok(())
}

fn prompt_edit(item: &mut LinkItem) -> Result<()> {
    println!("Editing link: {}", item.id);
    println!("Press Enter to keep current value, or type new value.\n");

    let mut changes = LinkEdit::default();
    changes.name = prompt_with_default("Name", &item.name)?;
    changes.url = prompt_with_default("URL", &item.url)?;
    changes.path = prompt_with_default("Folder (A/B, '/' for none)", &item.path.to_key())?;
    changes.tags = prompt_with_default("Tags (comma-separated)", &item.tags.join(", "))?
        .map(|tags| vec![tags]);
    changes.apply(item);
    Ok(())
}

/// Delete a link
pub fn delete(store: &mut Store, id: String, output: &Output) -> Result<()> {
    let item = store.resolve_item(&id)?;
    let uuid = item.id;

    if output.should_prompt() {
        println!("Delete link: {} - {}", uuid, item.name);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .delete_item(uuid)
        .with_context(|| format!("Link not found: {}", uuid))?;

    output.success(&format!("Deleted link: {}", uuid));
    Ok(())
}

/// Tags may be given repeated or comma-separated
fn split_tags(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|t| t.split(','))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
