//! URL handling module for Link-Crawler
//!
//! This module turns raw link strings into [`CanonicalLink`] keys, the identity
//! the frontier deduplicates on.

mod canonical;
mod normalize;

pub use canonical::{canonicalize, CanonicalLink};
pub use normalize::normalize_url;
