use crate::url::normalize::normalize_url;
use std::fmt;
use url::Url;

/// Comparable key identifying one crawl target
///
/// Two raw links that normalize to the same URL produce equal keys. A raw link
/// that does not parse keeps its trimmed text, so it is still claimed once and
/// then reported as a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalLink(String);

impl CanonicalLink {
    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the key back into a URL
    pub fn to_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derives the canonical key for a raw link
///
/// # Examples
///
/// ```
/// use link_crawler::url::canonicalize;
///
/// let a = canonicalize("HTTPS://Example.com:443/page#top");
/// let b = canonicalize("https://example.com/page");
/// assert_eq!(a, b);
/// ```
pub fn canonicalize(raw: &str) -> CanonicalLink {
    match normalize_url(raw) {
        Ok(url) => CanonicalLink(url.into()),
        Err(e) => {
            tracing::trace!("Keeping raw key for unparsable link {:?}: {}", raw, e);
            CanonicalLink(raw.trim().to_string())
        }
    }
}
