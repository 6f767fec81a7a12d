//! ReAct agent implementation (wraps AgentExecutor)

use crate::executor::AgentExecutor;
use agent_core::{Agent, Context, Result};
use async_trait::async_trait;

/// An agent that answers each input with a fresh ReAct session
///
/// Every call starts from an empty history bound to the given context. Use
/// [`AgentExecutor::session`] directly for multi-turn conversations.
pub struct ReActAgent {
    executor: AgentExecutor,
    name: String,
}

impl ReActAgent {
    /// Create a new ReAct agent
    pub fn new(executor: AgentExecutor, name: impl Into<String>) -> Self {
        Self {
            executor,
            name: name.into(),
        }
    }

    /// Get a reference to the underlying executor
    pub fn executor(&self) -> &AgentExecutor {
        &self.executor
    }
}

#[async_trait]
impl Agent for ReActAgent {
    async fn process(&self, input: String, context: &Context) -> Result<String> {
        let mut session = self.executor.session(context.clone())?;
        let response = self.executor.chat(&mut session, &input).await?;
        Ok(response.response)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
