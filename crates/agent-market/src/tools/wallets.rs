//! Wallet balances for the signed-in user

use agent_core::Result as AgentResult;
use agent_llm::tools::schema;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{TOKEN_ARG, parse_params, require_token};
use crate::api::{MarketDataClient, as_f64, items, text};
use crate::error::Result;

const DESCRIPTION: &str = concat!(
    "Retrieves wallet addresses and their current balances for a given user.",
    "Input args: ",
    "jwt_token (str): User's authorization token",
    "Returns:",
    "- List of wallet addresses owned by the user",
    "- Current SUI balance for each wallet",
    "- Total balance across all wallets",
    "\nUse this tool when you need to:",
    "- Check available SUI balance before executing trades",
    "- Verify which wallet has sufficient funds",
    "- Get an overview of user's total holdings in SUI",
    "- Select appropriate wallet for transactions",
);

/// Reports the user's wallets, richest first
pub struct WalletBalanceTool {
    client: MarketDataClient,
}

#[derive(Debug, Deserialize)]
struct WalletParams {
    #[serde(default)]
    jwt_token: String,
}

impl WalletBalanceTool {
    /// Create a new wallet balance tool
    pub fn new(client: MarketDataClient) -> Self {
        Self { client }
    }

    async fn balances(&self, params: WalletParams) -> Result<Value> {
        let token = require_token(&params.jwt_token)?;
        let body = self.client.wallets(token).await?;

        let mut wallets: Vec<(Value, f64)> = items(body, &["wallets", "docs", "data"])?
            .iter()
            .map(|wallet| (text(wallet, "address"), as_f64(wallet.get("balance"))))
            .collect();
        wallets.sort_by(|a, b| b.1.total_cmp(&a.1));

        let total: f64 = wallets.iter().map(|(_, balance)| balance).sum();
        let count = wallets.len();
        let wallets: Vec<Value> = wallets
            .into_iter()
            .map(|(address, balance)| json!({ "address": address, "balanceSui": balance }))
            .collect();

        Ok(json!({
            "wallets": wallets,
            "walletCount": count,
            "totalBalanceSui": total,
        }))
    }
}

#[async_trait]
impl Tool for WalletBalanceTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: WalletParams = parse_params(params)?;
        Ok(self.balances(params).await?)
    }

    fn name(&self) -> &str {
        "get_wallet_balance"
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn input_schema(&self) -> Value {
        schema::object(json!({ "jwt_token": schema::string(TOKEN_ARG) }), &["jwt_token"])
    }
}
