//! Configuration for market-data operations

use crate::error::{MarketError, Result};
use crate::tools::trending::RESOLUTIONS;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Environment variable holding the market-data API base URL
pub const ENV_API_URL: &str = "MARKET_API_URL";
/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "MARKET_API_TIMEOUT_SECS";

/// Configuration for the market-data API and the tools built on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Base URL of the market-data API, without a trailing path
    pub api_base_url: String,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Network the trending endpoint is queried for
    pub network: String,

    /// Page size requested from the search endpoint
    pub search_page_size: u32,

    /// Liquidity a search result needs to be listed (exclusive)
    pub min_liquidity_usd: f64,

    /// Maximum number of search results returned
    pub max_search_results: usize,

    /// Trending pairs returned when no limit is given
    pub default_trending_limit: u32,

    /// Upper bound on the trending limit a caller may ask for
    pub max_trending_limit: u32,

    /// Trending resolution used when none is given
    pub default_resolution: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            request_timeout: Duration::from_secs(30),
            network: "sui".to_string(),
            search_page_size: 10,
            min_liquidity_usd: 10_000.0,
            max_search_results: 10,
            default_trending_limit: 5,
            max_trending_limit: 50,
            default_resolution: "5m".to_string(),
        }
    }
}

impl MarketConfig {
    /// Create a new configuration builder
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::default()
    }

    /// Load from the process environment
    ///
    /// `MARKET_API_URL` is required; `MARKET_API_TIMEOUT_SECS` is optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary lookup function
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_base_url = lookup(ENV_API_URL).ok_or_else(|| {
            MarketError::Config(format!("{ENV_API_URL} environment variable not set"))
        })?;

        let mut builder = Self::builder().api_base_url(api_base_url);
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .parse()
                .map_err(|_| MarketError::Config(format!("invalid {ENV_TIMEOUT_SECS} '{raw}'")))?;
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base_url).map_err(|e| {
            MarketError::Config(format!("invalid API base URL '{}': {e}", self.api_base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(MarketError::Config(format!(
                "API base URL must be http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(MarketError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.search_page_size == 0
            || self.max_search_results == 0
            || self.default_trending_limit == 0
            || self.max_trending_limit == 0
        {
            return Err(MarketError::Config(
                "limits must be greater than 0".to_string(),
            ));
        }

        if self.default_trending_limit > self.max_trending_limit {
            return Err(MarketError::Config(
                "default_trending_limit must not exceed max_trending_limit".to_string(),
            ));
        }

        if !RESOLUTIONS.contains(&self.default_resolution.as_str()) {
            return Err(MarketError::Config(format!(
                "default_resolution must be one of {}, got '{}'",
                RESOLUTIONS.join(", "),
                self.default_resolution
            )));
        }

        Ok(())
    }

    /// Full URL for an API path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url.trim_end_matches('/'))
    }
}

/// Builder for MarketConfig
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    api_base_url: Option<String>,
    request_timeout: Option<Duration>,
    network: Option<String>,
    min_liquidity_usd: Option<f64>,
    max_search_results: Option<usize>,
    default_trending_limit: Option<u32>,
    max_trending_limit: Option<u32>,
    default_resolution: Option<String>,
}

impl MarketConfigBuilder {
    /// Set the API base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the network for trending queries
    pub fn network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Set the search liquidity threshold
    pub fn min_liquidity_usd(mut self, value: f64) -> Self {
        self.min_liquidity_usd = Some(value);
        self
    }

    /// Set the maximum number of search results
    pub fn max_search_results(mut self, value: usize) -> Self {
        self.max_search_results = Some(value);
        self
    }

    /// Set the default trending limit
    pub fn default_trending_limit(mut self, value: u32) -> Self {
        self.default_trending_limit = Some(value);
        self
    }

    /// Set the maximum trending limit
    pub fn max_trending_limit(mut self, value: u32) -> Self {
        self.max_trending_limit = Some(value);
        self
    }

    /// Set the default trending resolution
    pub fn default_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.default_resolution = Some(resolution.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<MarketConfig> {
        let defaults = MarketConfig::default();
        let config = MarketConfig {
            api_base_url: self
                .api_base_url
                .ok_or_else(|| MarketError::Config("API base URL not set".to_string()))?,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            network: self.network.unwrap_or(defaults.network),
            search_page_size: defaults.search_page_size,
            min_liquidity_usd: self.min_liquidity_usd.unwrap_or(defaults.min_liquidity_usd),
            max_search_results: self.max_search_results.unwrap_or(defaults.max_search_results),
            default_trending_limit: self
                .default_trending_limit
                .unwrap_or(defaults.default_trending_limit),
            max_trending_limit: self.max_trending_limit.unwrap_or(defaults.max_trending_limit),
            default_resolution: self.default_resolution.unwrap_or(defaults.default_resolution),
        };

        config.validate()?;
        Ok(config)
    }
}
