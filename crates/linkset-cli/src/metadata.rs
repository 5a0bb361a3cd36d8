//! Page title fetching
//!
//! Used to name links that are added or captured without a name.

use anyhow::Result;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 5;

/// Fetch the page title of a URL
///
/// Returns `None` on any failure (graceful degradation).
pub async fn fetch_title(url: &str) -> Option<String> {
    match fetch_title_inner(url).await {
        Ok(title) => title,
        Err(e) => {
            debug!("Title fetch for {} failed: {}", url, e);
            None
        }
    }
}

async fn fetch_title_inner(url: &str) -> Result<Option<String>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT))
        .user_agent("Mozilla/5.0 (compatible; linkset/0.3)")
        .build()?;

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Ok(None);
    }

    let html = response.text().await?;
    Ok(extract_title(&Html::parse_document(&html)))
}

/// og:title, then twitter:title, then `<title>`
fn extract_title(document: &Html) -> Option<String> {
    for property in ["og:title", "twitter:title"] {
        if let Some(title) = meta_content(document, property) {
            return Some(title);
        }
    }

    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Content of a meta tag matched by `property` or `name`
fn meta_content(document: &Html, key: &str) -> Option<String> {
    ["property", "name"].iter().find_map(|attr| {
        let selector = Selector::parse(&format!(r#"meta[{}="{}"]"#, attr, key)).ok()?;
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_of(html: &str) -> Option<String> {
        extract_title(&Html::parse_document(html))
    }

    #[test]
    fn test_title_tag() {
        let html = "<html><head><title>  Test Page </title></head><body></body></html>";
        assert_eq!(title_of(html), Some("Test Page".to_string()));
    }

    #[test]
    fn test_opengraph_wins() {
        let html = r#"
            <html><head>
                <title>Fallback Title</title>
                <meta property="og:title" content="OG Title">
            </head></html>
        "#;
        assert_eq!(title_of(html), Some("OG Title".to_string()));
    }

    #[test]
    fn test_twitter_name_attribute() {
        let html = r#"<html><head><meta name="twitter:title" content="Tweet"></head></html>"#;
        assert_eq!(title_of(html), Some("Tweet".to_string()));
    }

    #[test]
    fn test_no_title() {
        assert!(title_of("<html><head></head><body></body></html>").is_none());
        assert!(title_of("<html><head><title>   </title></head></html>").is_none());
    }
}
