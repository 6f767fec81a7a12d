//! Token search by name, symbol or ticker

use agent_core::Result as AgentResult;
use agent_llm::tools::schema;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{TOKEN_ARG, parse_params};
use crate::api::{MarketDataClient, as_f64, text};
use crate::config::MarketConfig;
use crate::error::{MarketError, Result};

const DESCRIPTION: &str = concat!(
    "Retrieves the token address based on the token name, symbol, or ticker.",
    "Input args: ",
    "query (str): Token name, symbol, or ticker (e.g., 'SUDENG', 'hippo'). ",
    "jwt_token (str): User's authorization token",
    "Output: Returns token information including:",
    "- Token address (contract address)",
    "- Token name",
    "- Token symbol",
    "- Token price",
    "- Liquidity (liquidityUsd)",
);

/// Looks a token up through the search endpoint
pub struct SearchTokenTool {
    client: MarketDataClient,
}

/// Arguments; a `jwt_token` is accepted but the endpoint is public
#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
}

impl SearchTokenTool {
    /// Create a new search tool
    pub fn new(client: MarketDataClient) -> Self {
        Self { client }
    }

    async fn search(&self, params: SearchParams) -> Result<Value> {
        let query = params.query.trim();
        if query.is_empty() {
            return Err(MarketError::InvalidInput("query must not be empty".to_string()));
        }

        let body = self.client.search(query).await?;
        let docs = match body.get("docs") {
            Some(Value::Array(docs)) => docs.clone(),
            Some(_) => {
                return Err(MarketError::InvalidResponse(
                    "'docs' is not a list".to_string(),
                ));
            }
            None => Vec::new(),
        };

        Ok(select_tokens(docs, query, self.client.config()))
    }
}

/// Pick the tokens to report for a query
///
/// Docs are ranked by liquidity. The most liquid doc whose symbol equals the
/// query (ignoring case) is returned on its own with bare field names;
/// otherwise every doc above the liquidity threshold is listed under
/// `token_`-prefixed names, up to the configured maximum.
fn select_tokens(mut docs: Vec<Value>, query: &str, config: &MarketConfig) -> Value {
    docs.sort_by(|a, b| as_f64(b.get("liquidityUsd")).total_cmp(&as_f64(a.get("liquidityUsd"))));

    let mut tokens = Vec::new();
    for doc in &docs {
        let token = summarize(doc);
        let is_exact = token["symbol"]
            .as_str()
            .is_some_and(|symbol| symbol.eq_ignore_ascii_case(query));
        if is_exact {
            return token;
        }
        if token["liquidityUsd"].as_f64().unwrap_or_default() > config.min_liquidity_usd {
            tokens.push(listed(&token));
        }
    }

    if tokens.is_empty() {
        return Value::String(format!("No tokens found for {query}"));
    }
    tokens.truncate(config.max_search_results);
    json!({ "tokens": tokens })
}

fn summarize(doc: &Value) -> Value {
    let base = doc.get("tokenBase").unwrap_or(&Value::Null);
    json!({
        "address": text(base, "address"),
        "name": text(base, "name"),
        "symbol": text(base, "symbol"),
        "priceUsd": as_f64(base.get("priceUsd")),
        "liquidityUsd": as_f64(doc.get("liquidityUsd")),
    })
}

/// Rename a summary's fields for the list output
fn listed(token: &Value) -> Value {
    json!({
        "token_address": token["address"],
        "token_name": token["name"],
        "token_symbol": token["symbol"],
        "token_priceUsd": token["priceUsd"],
        "token_liquidityUsd": token["liquidityUsd"],
    })
}

#[async_trait]
impl Tool for SearchTokenTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: SearchParams = parse_params(params)?;
        Ok(self.search(params).await?)
    }

    fn name(&self) -> &str {
        "search_token"
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "query": schema::string("Token name, symbol, or ticker (e.g., 'SUDENG', 'hippo')"),
                "jwt_token": schema::string(TOKEN_ARG),
            }),
            &["query"],
        )
    }
}
