//! Seed resolution
//!
//! A crawl starts from a seed document served over HTTP:
//!
//! ```json
//! { "links": ["https://example.com/", "https://example.org/about"] }
//! ```
//!
//! Every problem with the endpoint or the document is fatal to the run and is
//! reported as a [`SeedError`] before any page is fetched.

use crate::SeedError;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// The seed document served by the start endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SeedDocument {
    #[serde(default)]
    pub links: Vec<String>,
}

/// Parses a seed document from its JSON text
pub fn parse_seed_document(body: &str) -> Result<SeedDocument, SeedError> {
    Ok(serde_json::from_str(body)?)
}

/// Validates a start endpoint without touching the network
///
/// # Returns
///
/// * `Ok(Url)` - The endpoint as an HTTP(S) URL
/// * `Err(SeedError::EndpointNotSet)` - The endpoint is missing or blank
/// * `Err(SeedError::InvalidEndpoint)` - The endpoint is not an HTTP(S) URL
pub fn parse_endpoint(endpoint: Option<&str>) -> Result<Url, SeedError> {
    let endpoint = endpoint.map(str::trim).unwrap_or_default();
    if endpoint.is_empty() {
        return Err(SeedError::EndpointNotSet);
    }

    let url = Url::parse(endpoint).map_err(|e| SeedError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(SeedError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url)
}

/// Fetches the seed document and returns its links
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `endpoint` - The configured start endpoint, if any
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The raw seed links, possibly with duplicates
/// * `Err(SeedError)` - Endpoint unset, unreachable, non-2xx, empty or invalid JSON
pub async fn resolve_seed_links(
    client: &Client,
    endpoint: Option<&str>,
) -> Result<Vec<String>, SeedError> {
    let url = parse_endpoint(endpoint)?;
    let endpoint = url.to_string();
    tracing::info!("Resolving seed links from {}", endpoint);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| SeedError::Unreachable {
            endpoint: endpoint.clone(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SeedError::Status {
            endpoint,
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| SeedError::Unreachable {
            endpoint: endpoint.clone(),
            source,
        })?;

    if body.trim().is_empty() {
        return Err(SeedError::EmptyBody { endpoint });
    }

    let document = parse_seed_document(&body)?;
    tracing::info!("Seed document lists {} links", document.links.len());

    Ok(document.links)
}
