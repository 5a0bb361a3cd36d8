//! Capture command handler

use anyhow::{bail, Context, Result};

use linkset_core::import::{is_web_url, normalize_url};
use linkset_core::{Config, LinkItem, Store};

use crate::metadata::fetch_title;
use crate::output::Output;

/// Put a link in the capture inbox
///
/// The library itself is not opened; the link is merged (or skipped as a
/// duplicate) the next time a session starts.
pub async fn capture(
    config: &Config,
    url: String,
    name: Option<String>,
    output: &Output,
) -> Result<()> {
    let url = normalize_url(url.trim());
    if !is_web_url(&url) {
        bail!("Only http and https links can be captured: {}", url);
    }

    let name = match name.filter(|n| !n.trim().is_empty()) {
        Some(name) => Some(name),
        None => fetch_title(&url).await,
    };

    let mut item = LinkItem::new(url);
    if let Some(name) = name {
        item.set_name(name);
    }

    Store::capture(config, &item).context("Failed to capture link")?;

    output.success(&format!("Captured: {}", item.name));
    Ok(())
}
