//! Trending pairs on the SUI network

use agent_core::Result as AgentResult;
use agent_llm::tools::schema;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{TOKEN_ARG, parse_params};
use crate::api::{MarketDataClient, as_f64, items, text};
use crate::error::{MarketError, Result};

/// Resolutions the trending endpoint understands
pub const RESOLUTIONS: [&str; 4] = ["5m", "1h", "6h", "24h"];

const DESCRIPTION: &str = concat!(
    "Get a list of trending trading pairs on the SUI network.",
    "Input args: ",
    "resolution (str): Time frame, one of 5m, 1h, 6h, 24h (default: 5m). ",
    "limit (int): Maximum number of pairs to return (default: 5)",
    "Returns for each pair:",
    "- Base token address, name, symbol and price in USD",
    "- Liquidity and trading volume in USD",
    "- Price change percentages over 5m, 1h, 6h and 24h",
    "\nUse this tool when you need to:",
    "- Find tokens that are currently trading actively",
    "- Suggest trading opportunities",
);

/// Lists trending pairs in upstream order
pub struct TrendingPairsTool {
    client: MarketDataClient,
}

/// Arguments; a `jwt_token` is accepted but the endpoint is public
#[derive(Debug, Deserialize)]
struct TrendingParams {
    #[serde(default)]
    resolution: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
}

impl TrendingPairsTool {
    /// Create a new trending pairs tool
    pub fn new(client: MarketDataClient) -> Self {
        Self { client }
    }

    async fn trending(&self, params: TrendingParams) -> Result<Value> {
        let config = self.client.config();

        let resolution = params
            .resolution
            .unwrap_or_else(|| config.default_resolution.clone());
        if !RESOLUTIONS.contains(&resolution.as_str()) {
            return Err(MarketError::InvalidInput(format!(
                "resolution must be one of {}, got '{resolution}'",
                RESOLUTIONS.join(", ")
            )));
        }

        let limit = params.limit.unwrap_or(config.default_trending_limit);
        if limit == 0 {
            return Err(MarketError::InvalidInput(
                "limit must be greater than 0".to_string(),
            ));
        }
        let limit = limit.min(config.max_trending_limit);

        let body = self.client.trending_pairs(&resolution, limit).await?;
        let pairs: Vec<Value> = items(body, &["pairs", "docs"])?
            .iter()
            .take(limit as usize)
            .map(summarize)
            .collect();

        Ok(json!({ "pairs": pairs }))
    }
}

fn summarize(pair: &Value) -> Value {
    let base = pair.get("tokenBase").unwrap_or(&Value::Null);
    let percent = pair
        .get("stats")
        .and_then(|stats| stats.get("percent"))
        .unwrap_or(&Value::Null);

    json!({
        "tokenBase": {
            "address": text(base, "address"),
            "name": text(base, "name"),
            "symbol": text(base, "symbol"),
            "priceUsd": as_f64(base.get("priceUsd")),
        },
        "liquidityUsd": as_f64(pair.get("liquidityUsd")),
        "volumeUsd": as_f64(pair.get("volumeUsd")),
        "priceChange": {
            "5m": as_f64(percent.get("5m")),
            "1h": as_f64(percent.get("1h")),
            "6h": as_f64(percent.get("6h")),
            "24h": as_f64(percent.get("24h")),
        }
    })
}

#[async_trait]
impl Tool for TrendingPairsTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: TrendingParams = parse_params(params)?;
        Ok(self.trending(params).await?)
    }

    fn name(&self) -> &str {
        "get_trending_pairs"
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "jwt_token": schema::string(TOKEN_ARG),
                "resolution": schema::string_enum("Time frame", &RESOLUTIONS, "5m"),
                "limit": schema::integer_with_default("Maximum number of pairs to return", 5),
            }),
            &[],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::tests::mock_client;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pair(symbol: &str, percent: Value) -> Value {
        json!({
            "pairId": format!("{symbol}-SUI"),
            "dex": { "name": "cetus" },
            "tokenBase": {
                "address": format!("0x{symbol}"),
                "name": symbol,
                "symbol": symbol,
                "priceUsd": "0.5"
            },
            "liquidityUsd": 120000,
            "volumeUsd": "3400.5",
            "stats": { "percent": percent }
        })
    }

    #[tokio::test]
    async fn test_default_request_and_price_changes() {
        let server = MockServer::start().await;
        let pairs: Vec<Value> = (0..7)
            .map(|i| pair(&format!("T{i}"), json!({ "5m": 1.5, "24h": "-3.2" })))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api/v1/sui/pairs/trending"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "5"))
            .and(query_param("resolution", "5m"))
            .and(query_param("network", "sui"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(pairs)))
            .expect(1)
            .mount(&server)
            .await;

        let tool = TrendingPairsTool::new(mock_client(&server));
        let result = tool.execute(json!({ "limit": 5 })).await.unwrap();

        let pairs = result["pairs"].as_array().unwrap();
        assert_eq!(pairs.len(), 5);
        assert_eq!(pairs[0]["tokenBase"]["symbol"], "T0");
        assert_eq!(pairs[4]["tokenBase"]["symbol"], "T4");
        assert_eq!(
            pairs[0]["priceChange"],
            json!({ "5m": 1.5, "1h": 0.0, "6h": 0.0, "24h": -3.2 })
        );
        assert_eq!(pairs[0]["tokenBase"]["priceUsd"], 0.5);
        assert_eq!(pairs[0]["volumeUsd"], 3400.5);
        assert!(pairs[0].get("pairId").is_none());
    }

    #[tokio::test]
    async fn test_user_token_is_not_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/sui/pairs/trending"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let tool = TrendingPairsTool::new(mock_client(&server));
        tool.execute(json!({ "jwt_token": "jwt-abc" })).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_missing_stats_default_to_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("resolution", "1h"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "tokenBase": {} }])))
            .mount(&server)
            .await;

        let tool = TrendingPairsTool::new(mock_client(&server));
        let result = tool.execute(json!({ "resolution": "1h" })).await.unwrap();
        assert_eq!(
            result["pairs"][0]["priceChange"],
            json!({ "5m": 0.0, "1h": 0.0, "6h": 0.0, "24h": 0.0 })
        );
        assert_eq!(result["pairs"][0]["tokenBase"]["symbol"], Value::Null);
    }

    #[tokio::test]
    async fn test_limit_is_clamped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let tool = TrendingPairsTool::new(mock_client(&server));
        let result = tool.execute(json!({ "limit": 500 })).await.unwrap();
        assert_eq!(result, json!({ "pairs": [] }));
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let server = MockServer::start().await;
        let tool = TrendingPairsTool::new(mock_client(&server));

        let err = tool.execute(json!({ "resolution": "2d" })).await.unwrap_err();
        assert!(err.to_string().contains("resolution must be one of"));
        assert!(tool.execute(json!({ "limit": 0 })).await.is_err());
        assert!(tool.execute(json!({ "limit": "five" })).await.is_err());
    }

    #[tokio::test]
    async fn test_server_error_is_reported_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .expect(1)
            .mount(&server)
            .await;

        let tool = TrendingPairsTool::new(mock_client(&server));
        let err = tool.execute(json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "API error 500: upstream down");
    }
}
