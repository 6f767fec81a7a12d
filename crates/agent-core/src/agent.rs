//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// Core trait that all agents must implement
///
/// The context carries the per-session values (auth token, domain context)
/// that the agent injects into its prompt. Message types live in the
/// agent-llm crate as they are LLM-specific.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process input and return output
    ///
    /// The input/output types are intentionally kept as String for maximum
    /// flexibility. Concrete implementations can parse/format as needed.
    async fn process(&self, input: String, context: &Context) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;
}
