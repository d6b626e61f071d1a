use serde::Deserialize;

/// Main configuration structure for Link-Crawler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL of the seed document (`{ "links": [...] }`)
    #[serde(rename = "start-endpoint", default)]
    pub start_endpoint: Option<String>,

    /// Number of runtime worker threads
    #[serde(rename = "core-pool-size", default = "default_core_pool_size")]
    pub core_pool_size: u32,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-pool-size", default = "default_max_pool_size")]
    pub max_pool_size: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Redirect hops the HTTP client follows; 0 disables following
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_endpoint: None,
            core_pool_size: default_core_pool_size(),
            max_pool_size: default_max_pool_size(),
            request_timeout: default_request_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "LinkCrawler".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Control surface configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the REST control surface binds to
    #[serde(rename = "bind-address", default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_core_pool_size() -> u32 {
    5
}

fn default_max_pool_size() -> u32 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_redirects() -> u32 {
    10
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}
