use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads, parses and validates the TOML configuration at `path`
///
/// Missing sections and keys take their defaults; see [`Config`].
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use link_crawler::config::load_config;
///
/// let config = load_config(Path::new("crawler.toml")).unwrap();
/// println!("Workers: {}", config.crawler.max_pool_size);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Hex-encoded SHA-256 digest of configuration text
///
/// Logged at startup so two runs can be matched to the exact configuration
/// they used.
pub fn hash_config(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Computes the digest of the configuration file at `path`
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    Ok(hash_config(&std::fs::read_to_string(path)?))
}

/// Loads a configuration along with the digest of the text it was parsed from
///
/// The file is read once, so the digest always matches the loaded settings.
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_config(&content)))
}
