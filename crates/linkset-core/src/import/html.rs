//! Netscape bookmark file import
//!
//! Browsers export bookmarks as nested `<DL>` lists. A `<DT>` holding an
//! `<H3>` is a folder whose contents follow in a `<DL>`; a `<DT>` holding
//! an `<A HREF>` is a bookmark. Folder names accumulate into the path of
//! every bookmark below them.

use scraper::{ElementRef, Html, Selector};

use super::web_candidate;
use crate::models::LinkItem;
use crate::path::FolderPath;

struct Selectors {
    list: Selector,
    heading: Selector,
    anchor: Selector,
}

impl Selectors {
    fn new() -> Option<Self> {
        Some(Self {
            list: Selector::parse("dl").ok()?,
            heading: Selector::parse("h3").ok()?,
            anchor: Selector::parse("a").ok()?,
        })
    }
}

/// Parse a bookmark file into candidate items.
///
/// Non-web links are skipped. A document without any `<DL>` yields nothing.
pub fn parse_bookmarks_html(html: &str) -> Vec<LinkItem> {
    let Some(selectors) = Selectors::new() else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    let mut items = Vec::new();
    if let Some(root) = document.select(&selectors.list).next() {
        walk(root, &FolderPath::root(), &selectors, &mut items);
    }
    items
}

fn walk(list: ElementRef<'_>, path: &FolderPath, selectors: &Selectors, out: &mut Vec<LinkItem>) {
    for child in list.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "dt" => {
                if let Some(heading) = child.select(&selectors.heading).next() {
                    let folder = path.child(text_of(heading));
                    let nested = next_element(child)
                        .filter(|el| el.value().name() == "dl")
                        .or_else(|| child.select(&selectors.list).next());
                    if let Some(nested) = nested {
                        walk(nested, &folder, selectors, out);
                    }
                } else if let Some(anchor) = child.select(&selectors.anchor).next() {
                    let href = anchor.value().attr("href").unwrap_or("");
                    if let Some(item) = web_candidate(&text_of(anchor), href, path.clone()) {
                        out.push(item);
                    }
                }
            }
            "dl" => walk(child, path, selectors, out),
            _ => {}
        }
    }
}

fn next_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
