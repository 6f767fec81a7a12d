//! Market-data tools exposed to the ReAct loop

pub mod positions;
pub mod search;
pub mod trending;
pub mod wallets;

pub use positions::{AllPositionsTool, PositionsByTokenTool};
pub use search::SearchTokenTool;
pub use trending::TrendingPairsTool;
pub use wallets::WalletBalanceTool;

use crate::api::MarketDataClient;
use crate::error::{MarketError, Result};
use agent_tools::ToolRegistry;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Description of the `jwt_token` argument shared by every tool
const TOKEN_ARG: &str = "User's authorization token";

/// Registry holding the five market tools, all sharing one client
///
/// Listing order is the order the LLM sees them in the system prompt.
pub fn build_registry(client: &MarketDataClient) -> agent_core::Result<ToolRegistry> {
    ToolRegistry::builder()
        .with_tool(WalletBalanceTool::new(client.clone()))
        .with_tool(AllPositionsTool::new(client.clone()))
        .with_tool(PositionsByTokenTool::new(client.clone()))
        .with_tool(SearchTokenTool::new(client.clone()))
        .with_tool(TrendingPairsTool::new(client.clone()))
        .build()
}

/// Decode tool arguments into a parameter struct
fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params).map_err(|e| MarketError::InvalidInput(e.to_string()))
}

fn require_token(token: &str) -> Result<&str> {
    let token = token.trim();
    if token.is_empty() {
        return Err(MarketError::InvalidInput(
            "jwt_token is required for this tool".to_string(),
        ));
    }
    Ok(token)
}
