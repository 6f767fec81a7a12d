//! Crypto trading assistant
//!
//! This crate connects the ReAct runtime to a market-data HTTP API:
//!
//! - `api`: a thin client for the search, trending, wallet and position endpoints
//! - `tools`: the five tools the LLM can call (`get_wallet_balance`,
//!   `get_all_positions`, `get_positions_by_token`, `search_token`,
//!   `get_trending_pairs`)
//! - `prompts`: the system prompt
//! - `assistant`: [`TradingAssistant`], which assembles everything once and
//!   serves any number of sessions
//!
//! # Example
//!
//! ```rust,no_run
//! use agent_core::Context;
//! use agent_llm::LlmSettings;
//! use agent_market::{MarketConfig, TradingAssistant};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let assistant = TradingAssistant::builder()
//!     .market_config(MarketConfig::from_env()?)
//!     .provider(LlmSettings::from_env()?.build_provider()?)
//!     .build()?;
//!
//! let mut session = assistant.session(Context::new().with_auth_token("eyJhbGciOi..."))?;
//! let response = assistant.chat(&mut session, "What's trending on SUI?").await?;
//! println!("{}", response.response);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod prompts;
pub mod tools;

pub use api::MarketDataClient;
pub use assistant::{TradingAssistant, TradingAssistantBuilder};
pub use config::MarketConfig;
pub use error::{MarketError, Result};
pub use tools::build_registry;
