//! Token positions held across the user's wallets

use agent_core::Result as AgentResult;
use agent_llm::tools::schema;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{TOKEN_ARG, parse_params, require_token};
use crate::api::{MarketDataClient, as_f64, items, text};
use crate::error::{MarketError, Result};

const ALL_DESCRIPTION: &str = concat!(
    "Get all positions from user's wallets. Returns detailed information including:",
    "- Token symbol",
    "- Token name",
    "- Token contract address",
    "- Token balance",
    "- Wallet address holding the token",
    "Input args: ",
    "jwt_token (str): User's authorization token",
    "Use this tool when:",
    "- Need an overview of all tokens in wallets",
    "- Want to check balances of multiple tokens at once",
    "- Analyzing investment portfolio",
    "- Preparing for multi-token management",
);

const BY_TOKEN_DESCRIPTION: &str = concat!(
    "Get the user's positions in one token across all wallets.",
    "Input args: ",
    "query (str): Token symbol or contract address. ",
    "jwt_token (str): User's authorization token",
    "Returns for each wallet holding the token:",
    "- Token symbol, name and contract address",
    "- Token balance",
    "- Wallet address holding the token",
    "\nUse this tool when you need to:",
    "- Check how much of a token the user holds before selling",
    "- Find which wallet holds a token",
);

/// Fetch held positions, largest balance first
async fn held_positions(client: &MarketDataClient, token: &str) -> Result<Vec<Value>> {
    let body = client.positions(token).await?;

    let mut positions: Vec<(Value, f64)> = items(body, &["positions", "docs", "data"])?
        .iter()
        .map(|item| {
            let balance = as_f64(item.get("balance"));
            let position = json!({
                "symbol": text(item, "symbol"),
                "name": text(item, "name"),
                "tokenAddress": text(item, "tokenAddress"),
                "balance": balance,
                "walletAddress": text(item, "walletAddress"),
            });
            (position, balance)
        })
        .filter(|(_, balance)| *balance > 0.0)
        .collect();
    positions.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(positions.into_iter().map(|(position, _)| position).collect())
}

/// Whether a position matches a symbol (any case) or an exact token address
fn matches_token(position: &Value, query: &str) -> bool {
    position["symbol"]
        .as_str()
        .is_some_and(|symbol| symbol.eq_ignore_ascii_case(query))
        || position["tokenAddress"].as_str() == Some(query)
}

#[derive(Debug, Deserialize)]
struct AllPositionsParams {
    #[serde(default)]
    jwt_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenPositionsParams {
    #[serde(default)]
    jwt_token: String,
    query: String,
}

/// Lists every non-empty position
pub struct AllPositionsTool {
    client: MarketDataClient,
}

impl AllPositionsTool {
    /// Create a new positions tool
    pub fn new(client: MarketDataClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for AllPositionsTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: AllPositionsParams = parse_params(params)?;
        let token = require_token(&params.jwt_token)?;
        let positions = held_positions(&self.client, token).await?;
        Ok(json!({ "positions": positions }))
    }

    fn name(&self) -> &str {
        "get_all_positions"
    }

    fn description(&self) -> &str {
        ALL_DESCRIPTION
    }

    fn input_schema(&self) -> Value {
        schema::object(json!({ "jwt_token": schema::string(TOKEN_ARG) }), &["jwt_token"])
    }
}

/// Positions in a single token
pub struct PositionsByTokenTool {
    client: MarketDataClient,
}

impl PositionsByTokenTool {
    /// Create a new per-token positions tool
    pub fn new(client: MarketDataClient) -> Self {
        Self { client }
    }

    async fn positions_for(&self, params: TokenPositionsParams) -> Result<Value> {
        let token = require_token(&params.jwt_token)?;
        let query = params.query.trim();
        if query.is_empty() {
            return Err(MarketError::InvalidInput("query must not be empty".to_string()));
        }

        let positions: Vec<Value> = held_positions(&self.client, token)
            .await?
            .into_iter()
            .filter(|position| matches_token(position, query))
            .collect();

        if positions.is_empty() {
            return Ok(Value::String(format!("No positions found for {query}")));
        }
        Ok(json!({ "positions": positions }))
    }
}

#[async_trait]
impl Tool for PositionsByTokenTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: TokenPositionsParams = parse_params(params)?;
        Ok(self.positions_for(params).await?)
    }

    fn name(&self) -> &str {
        "get_positions_by_token"
    }

    fn description(&self) -> &str {
        BY_TOKEN_DESCRIPTION
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "query": schema::string("Token symbol or contract address"),
                "jwt_token": schema::string(TOKEN_ARG),
            }),
            &["query", "jwt_token"],
        )
    }
}
