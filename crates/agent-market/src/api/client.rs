//! HTTP client for the market-data API

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};

const SEARCH_PATH: &str = "/api/v1/search";
const TRENDING_PATH: &str = "/api/v1/sui/pairs/trending";
const WALLETS_PATH: &str = "/api/v1/wallets";
const POSITIONS_PATH: &str = "/api/v1/positions";

/// Market-data API client
///
/// Each call is a single GET with `accept: application/json`; failures are
/// returned to the caller and never retried here. Only the wallet and
/// position endpoints carry the user's bearer token.
#[derive(Debug, Clone)]
pub struct MarketDataClient {
    client: Client,
    config: Arc<MarketConfig>,
}

impl MarketDataClient {
    /// Create a client with the configured request timeout
    pub fn new(config: Arc<MarketConfig>) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| MarketError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Search tokens by name, symbol or address
    pub async fn search(&self, query: &str) -> Result<Value> {
        let params = [
            ("search", query.to_string()),
            ("page", "1".to_string()),
            ("limit", self.config.search_page_size.to_string()),
        ];
        self.get_json(SEARCH_PATH, &params, None).await
    }

    /// Trending pairs on the configured network
    pub async fn trending_pairs(&self, resolution: &str, limit: u32) -> Result<Value> {
        let params = [
            ("page", "1".to_string()),
            ("limit", limit.to_string()),
            ("resolution", resolution.to_string()),
            ("network", self.config.network.clone()),
        ];
        self.get_json(TRENDING_PATH, &params, None).await
    }

    /// Wallets owned by the token's user
    pub async fn wallets(&self, auth_token: &str) -> Result<Value> {
        self.get_json(WALLETS_PATH, &[], Some(auth_token)).await
    }

    /// Token positions across the user's wallets
    pub async fn positions(&self, auth_token: &str) -> Result<Value> {
        self.get_json(POSITIONS_PATH, &[], Some(auth_token)).await
    }

    /// GET a path and decode the JSON body
    ///
    /// Anything other than `200 OK` becomes [`MarketError::Api`] carrying the
    /// status and the raw body.
    #[instrument(skip(self, query, auth_token), fields(path = %path))]
    pub async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
        auth_token: Option<&str>,
    ) -> Result<Value> {
        let mut request = self
            .client
            .get(self.config.endpoint(path))
            .header(ACCEPT, "application/json")
            .query(query);
        if let Some(token) = auth_token.filter(|token| !token.is_empty()) {
            request = request.bearer_auth(token);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "market API request failed");
            MarketError::from(e)
        })?;

        let status = response.status();
        let duration_ms = started.elapsed().as_millis();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), duration_ms, "market API returned an error");
            return Err(MarketError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        debug!(status = status.as_u16(), duration_ms, bytes = body.len(), "market API response");
        Ok(serde_json::from_str(&body)?)
    }
}
