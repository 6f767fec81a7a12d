//! Trading assistant assembly
//!
//! Wires the market-data tools, the system prompt and an LLM provider into
//! one [`AgentRuntime`]. The runtime is built once and shared; every user
//! gets their own [`Session`].

use agent_core::{Context, Error, Result};
use agent_llm::LLMProvider;
use agent_prompt::PromptTemplate;
use agent_runtime::{
    AgentExecutor, AgentRuntime, ChatResponse, ExecutorConfig, ExecutorEventHandler, ReActAgent,
    Session, ToolFailurePolicy,
};
use agent_tools::ToolRegistry;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::api::MarketDataClient;
use crate::config::MarketConfig;
use crate::prompts::{system_prompt, system_prompt_with_context};
use crate::tools::build_registry;

/// ReAct trading assistant over the market-data API
#[derive(Clone)]
pub struct TradingAssistant {
    runtime: AgentRuntime,
    executor: AgentExecutor,
}

impl TradingAssistant {
    /// Create a new builder
    pub fn builder() -> TradingAssistantBuilder {
        TradingAssistantBuilder::default()
    }

    /// Shared runtime
    pub fn runtime(&self) -> &AgentRuntime {
        &self.runtime
    }

    /// Registered tools
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        self.runtime.tools()
    }

    /// Open a session for one user
    ///
    /// The context must carry an auth token, and a domain context as well
    /// when the assistant was built with the context section.
    pub fn session(&self, context: Context) -> Result<Session> {
        self.executor.session(context)
    }

    /// Answer one query
    pub async fn chat(&self, session: &mut Session, query: &str) -> Result<ChatResponse> {
        self.executor.chat(session, query).await
    }

    /// Answer one query, stopping early if `cancel` fires
    pub async fn chat_with_cancel(
        &self,
        session: &mut Session,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<ChatResponse> {
        self.executor.chat_with_cancel(session, query, cancel).await
    }

    /// Stateless agent answering each input in a fresh session
    pub fn agent(&self, name: impl Into<String>) -> ReActAgent {
        ReActAgent::new(self.executor.clone(), name)
    }
}

/// Builder for TradingAssistant
#[derive(Default)]
pub struct TradingAssistantBuilder {
    market: Option<MarketConfig>,
    provider: Option<Arc<dyn LLMProvider>>,
    config: ExecutorConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
    template: Option<Arc<dyn PromptTemplate>>,
    with_context: bool,
}

impl TradingAssistantBuilder {
    /// Set the market-data configuration
    pub fn market_config(mut self, config: MarketConfig) -> Self {
        self.market = Some(config);
        self
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replace the executor configuration
    pub fn executor_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the iteration cap
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the tool failure policy
    pub fn tool_failure_policy(mut self, policy: ToolFailurePolicy) -> Self {
        self.config.tool_failure_policy = policy;
        self
    }

    /// Report executor events to `handler`
    pub fn event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Use a custom system prompt instead of the built-in one
    pub fn system_prompt(mut self, template: Arc<dyn PromptTemplate>) -> Self {
        self.template = Some(template);
        self
    }

    /// Add a free-text context section to the built-in system prompt
    pub fn with_context_section(mut self, enabled: bool) -> Self {
        self.with_context = enabled;
        self
    }

    /// Build the assistant
    pub fn build(self) -> Result<TradingAssistant> {
        let market = self
            .market
            .ok_or_else(|| Error::Configuration("market config not set".to_string()))?;
        let provider = self
            .provider
            .ok_or_else(|| Error::InitializationFailed("Provider not set".to_string()))?;

        let client = MarketDataClient::new(Arc::new(market))?;
        let registry = Arc::new(build_registry(&client)?);

        let template: Arc<dyn PromptTemplate> = match self.template {
            Some(template) => template,
            None if self.with_context => Arc::new(system_prompt_with_context()?),
            None => Arc::new(system_prompt()?),
        };

        let runtime = AgentRuntime::builder()
            .provider(provider)
            .tool_registry(registry)
            .template(template)
            .config(self.config)
            .build()?;

        let mut executor = runtime.create_executor();
        if let Some(handler) = self.event_handler {
            executor.set_event_handler(handler);
        }

        info!(
            api_base_url = %client.config().api_base_url,
            tools = ?runtime.tools().names(),
            "Trading assistant ready"
        );

        Ok(TradingAssistant { runtime, executor })
    }
}
