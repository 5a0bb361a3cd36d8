//! JSON array import
//!
//! Accepts a top-level JSON array of plain objects. Entries without a
//! string `url` field are dropped one by one; a document that is not an
//! array (or not JSON at all) simply yields nothing.

use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::web_candidate;
use crate::models::LinkItem;
use crate::path::FolderPath;

/// Parse the top-level array, or nothing
fn parse_array(text: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            warn!("JSON import is not an array; nothing imported");
            Vec::new()
        }
        Err(e) => {
            warn!("JSON import could not be parsed: {}", e);
            Vec::new()
        }
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Candidates from a JSON file.
///
/// Every accepted entry gets a fresh identity, its name (or the URL when
/// missing) and its tags. Paths are not imported.
pub fn parse_json_import(text: &str) -> Vec<LinkItem> {
    let entries = parse_array(text);
    let total = entries.len();
    let items: Vec<LinkItem> = entries
        .iter()
        .filter_map(|entry| {
            let url = entry.get("url")?.as_str()?;
            let name = entry.get("name").and_then(Value::as_str).unwrap_or("");
            let mut item = web_candidate(name, url, FolderPath::root())?;
            item.set_tags(string_list(entry.get("tags")));
            Some(item)
        })
        .collect();
    debug!("JSON import accepted {} of {} entries", items.len(), total);
    items
}

/// Items previously written by linkset itself (capture inbox, remote mirror).
///
/// These keep their id when it is a valid UUID and keep their path. Only
/// the string `url` field is required.
pub fn parse_stored_entries(entries: &[Value]) -> Vec<LinkItem> {
    entries
        .iter()
        .filter_map(|entry| {
            let url = entry.get("url")?.as_str()?;
            let id = entry
                .get("id")
                .and_then(Value::as_str)
                .and_then(|s| Uuid::parse_str(s).ok())
                .unwrap_or_else(Uuid::new_v4);
            let mut item = LinkItem::with_id(id, url);
            item.added_at = None;
            if let Some(name) = entry.get("name").and_then(Value::as_str) {
                item.set_name(name);
            }
            item.set_tags(string_list(entry.get("tags")));
            item.set_path(FolderPath::new(string_list(entry.get("path"))));
            Some(item)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_import_keeps_entries_with_string_url() {
        let text = json!([
            {"name": "Rust", "url": "https://rust-lang.org", "tags": ["lang", 3]},
            {"url": "https://docs.rs"},
            {"name": "No url"},
            {"name": "Numeric", "url": 42},
            null,
            "https://bare-string.example"
        ])
        .to_string();

        let items = parse_json_import(&text);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Rust");
        assert_eq!(items[0].url, "https://rust-lang.org/");
        assert_eq!(items[0].tags, vec!["lang"]);
        assert_eq!(items[1].name, "https://docs.rs/");
    }

    #[test]
    fn test_import_assigns_fresh_ids_and_drops_path() {
        let original = Uuid::new_v4();
        let text = json!([
            {"id": original.to_string(), "name": "A", "url": "https://a.com/", "path": ["Work"]}
        ])
        .to_string();

        let items = parse_json_import(&text);

        assert_eq!(items.len(), 1);
        assert_ne!(items[0].id, original);
        assert!(items[0].path.is_empty());
    }

    #[test]
    fn test_import_filters_non_web_urls() {
        let text = json!([
            {"url": "ftp://files.example.com/"},
            {"url": "not a url"},
            {"url": "http://plain.example.com/"}
        ])
        .to_string();
        let items = parse_json_import(&text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "http://plain.example.com/");
    }

    #[test]
    fn test_import_malformed_documents() {
        assert!(parse_json_import("{ not json").is_empty());
        assert!(parse_json_import(r#"{"url": "https://a.com"}"#).is_empty());
        assert!(parse_json_import("").is_empty());
    }

    #[test]
    fn test_stored_entries_keep_identity_and_path() {
        let id = Uuid::new_v4();
        let entries = vec![
            json!({"id": id.to_string(), "name": "Kept", "url": "https://a.com", "path": ["Work", ""]}),
            json!({"id": "1700000000000", "url": "https://b.com"}),
            json!({"name": "dropped"}),
        ];

        let items = parse_stored_entries(&entries);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, id);
        assert_eq!(items[0].name, "Kept");
        // Stored URLs are taken as-is
        assert_eq!(items[0].url, "https://a.com");
        assert_eq!(items[0].path, FolderPath::parse("Work"));
        assert_ne!(items[1].id.to_string(), "1700000000000");
        assert_eq!(items[1].name, "https://b.com");
    }
}
