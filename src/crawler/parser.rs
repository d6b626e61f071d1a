//! HTML link extraction
//!
//! Collects the `href` of every `<a>` element and resolves it against the
//! page's own URL.

use scraper::{Html, Selector};
use url::Url;

/// Extracts every link target from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, in document order, resolved
///   against `base_url`
/// - targets of any scheme; `mailto:` or `ftp:` links are crawled like the
///   rest and fail when fetched
///
/// **Exclude:**
/// - empty and fragment-only hrefs (they point back at the page itself)
/// - hrefs that cannot be resolved against `base_url` at all
///
/// Duplicates are kept; deduplication is the frontier's job.
///
/// # Example
///
/// ```
/// use link_crawler::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// assert_eq!(extract_links(html, &base_url), vec!["https://example.com/page"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => Some(absolute_url.into()),
        Err(e) => {
            tracing::trace!("Dropping unresolvable href {:?}: {}", href, e);
            None
        }
    }
}
