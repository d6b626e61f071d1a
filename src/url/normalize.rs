use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a URL according to Link-Crawler's normalization rules
///
/// # Normalization Steps
///
/// 1. Parse the URL (surrounding whitespace is ignored); reject if malformed
/// 2. Reject anything but HTTP and HTTPS
/// 3. Lowercase scheme and host, drop the scheme's default port
/// 4. Resolve dot segments; an empty path becomes `/`
/// 5. Remove the fragment (everything after #)
/// 6. Remove an empty query string (trailing ?)
///
/// Path and query are otherwise left untouched: `/a` and `/a/` are different
/// resources, and so are differently ordered query strings.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use link_crawler::url::normalize_url;
///
/// let url = normalize_url("HTTP://EXAMPLE.COM:80/a/./b/../page?#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/a/page");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    // Steps 1, 3 and 4 are performed by the WHATWG parser for special schemes
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}
