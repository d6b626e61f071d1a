use crate::config::types::{Config, CrawlerConfig, ServerConfig, UserAgentConfig};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Upper bound on concurrent fetches a single run may open
const MAX_POOL_LIMIT: u32 = 100;

/// Redirect hops beyond this are treated as a misconfiguration
const MAX_REDIRECT_LIMIT: u32 = 20;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.core_pool_size < 1 {
        return Err(ConfigError::Validation(format!(
            "core_pool_size must be >= 1, got {}",
            config.core_pool_size
        )));
    }

    if config.max_pool_size < config.core_pool_size || config.max_pool_size > MAX_POOL_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_pool_size must be between core_pool_size ({}) and {}, got {}",
            config.core_pool_size, MAX_POOL_LIMIT, config.max_pool_size
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request_timeout must be >= 1 second".to_string(),
        ));
    }

    if config.max_redirects > MAX_REDIRECT_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= {}, got {}",
            MAX_REDIRECT_LIMIT, config.max_redirects
        )));
    }

    // An absent endpoint is allowed here; it is reported when a crawl starts.
    if let Some(endpoint) = config.start_endpoint.as_deref() {
        if !endpoint.is_empty() {
            Url::parse(endpoint).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid start_endpoint '{}': {}", endpoint, e))
            })?;
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_address.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!(
            "bind_address '{}' is not a socket address: {}",
            config.bind_address, e
        ))
    })?;

    Ok(())
}
