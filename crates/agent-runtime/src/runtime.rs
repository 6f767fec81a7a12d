//! Runtime holding the resources shared by every session
//!
//! The AgentRuntime owns the LLM provider, the tool registry and the system
//! prompt template, all behind `Arc` and never mutated after build. Executors
//! and agents created from it share those resources.

use agent_core::Result;
use agent_llm::LLMProvider;
use agent_prompt::PromptTemplate;
use agent_tools::ToolRegistry;
use std::sync::Arc;
use tracing::info;

use crate::agents::ReActAgent;
use crate::executor::{AgentExecutor, ExecutorConfig, ExecutorEventHandler};

/// Runtime for creating executors and agents over shared resources
///
/// # Example
///
/// ```no_run
/// use agent_runtime::{AgentRuntime, ExecutorConfig};
/// use agent_core::Context;
///
/// # async fn example(
/// #     provider: std::sync::Arc<dyn agent_llm::LLMProvider>,
/// #     tools: std::sync::Arc<agent_tools::ToolRegistry>,
/// #     template: std::sync::Arc<dyn agent_prompt::PromptTemplate>,
/// # ) -> agent_core::Result<()> {
/// let runtime = AgentRuntime::builder()
///     .provider(provider)
///     .tool_registry(tools)
///     .template(template)
///     .build()?;
///
/// let executor = runtime.create_executor();
/// let mut session = executor.session(Context::new().with_auth_token("jwt"))?;
/// let response = executor.chat(&mut session, "What's trending?").await?;
/// println!("{}", response.response);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AgentRuntime {
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    template: Arc<dyn PromptTemplate>,
    config: ExecutorConfig,
}

impl AgentRuntime {
    /// Create a new runtime builder
    pub fn builder() -> AgentRuntimeBuilder {
        AgentRuntimeBuilder::new()
    }

    /// Get a reference to the LLM provider
    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    /// Get a reference to the tool registry
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// Get a reference to the executor configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Create an executor over the shared resources
    pub fn create_executor(&self) -> AgentExecutor {
        AgentExecutor::new(
            Arc::clone(&self.provider),
            Arc::clone(&self.tool_registry),
            Arc::clone(&self.template),
            self.config.clone(),
        )
    }

    /// Create an executor that reports events to `handler`
    pub fn create_executor_with_handler(
        &self,
        handler: Arc<dyn ExecutorEventHandler>,
    ) -> AgentExecutor {
        self.create_executor().with_event_handler(handler)
    }

    /// Create a ReAct agent implementing [`agent_core::Agent`]
    pub fn create_react_agent(&self, name: impl Into<String>) -> ReActAgent {
        ReActAgent::new(self.create_executor(), name)
    }
}

/// Builder for AgentRuntime
pub struct AgentRuntimeBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tool_registry: Option<Arc<ToolRegistry>>,
    template: Option<Arc<dyn PromptTemplate>>,
    config: ExecutorConfig,
}

impl AgentRuntimeBuilder {
    /// Create a new runtime builder
    pub fn new() -> Self {
        Self {
            provider: None,
            tool_registry: None,
            template: None,
            config: ExecutorConfig::default(),
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = Some(registry);
        self
    }

    /// Set the system prompt template
    pub fn template(mut self, template: Arc<dyn PromptTemplate>) -> Self {
        self.template = Some(template);
        self
    }

    /// Set the executor configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the max iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Build the runtime
    ///
    /// # Errors
    ///
    /// Returns an error if the provider or template is not set, or the
    /// configuration is invalid
    pub fn build(self) -> Result<AgentRuntime> {
        let provider = self.provider.ok_or_else(|| {
            agent_core::Error::InitializationFailed("Provider not set".to_string())
        })?;
        let template = self.template.ok_or_else(|| {
            agent_core::Error::InitializationFailed("Prompt template not set".to_string())
        })?;
        self.config.validate()?;

        let tool_registry = self
            .tool_registry
            .unwrap_or_else(|| Arc::new(ToolRegistry::default()));

        info!(
            provider = provider.name(),
            model = %self.config.model,
            tool_count = tool_registry.len(),
            max_iterations = self.config.max_iterations,
            "Agent runtime built"
        );

        Ok(AgentRuntime {
            provider,
            tool_registry,
            template,
            config: self.config,
        })
    }
}

impl Default for AgentRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::tests::{ScriptedProvider, TEMPLATE};
    use agent_prompt::JinjaTemplate;

    fn template() -> Arc<dyn PromptTemplate> {
        Arc::new(JinjaTemplate::new("system", TEMPLATE).unwrap())
    }

    #[test]
    fn test_runtime_builder() {
        let builder = AgentRuntimeBuilder::new().max_iterations(5).model("test-model");

        assert_eq!(builder.config.max_iterations, 5);
        assert_eq!(builder.config.model, "test-model");
    }

    #[test]
    fn test_build_requires_provider_and_template() {
        assert!(AgentRuntime::builder().template(template()).build().is_err());
        assert!(
            AgentRuntime::builder()
                .provider(Arc::new(ScriptedProvider::replies(&[])))
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_executors_share_resources() {
        let runtime = AgentRuntime::builder()
            .provider(Arc::new(ScriptedProvider::replies(&[])))
            .template(template())
            .max_iterations(3)
            .build()
            .unwrap();

        let a = runtime.create_executor();
        let b = runtime.create_executor();
        assert!(Arc::ptr_eq(a.tools(), b.tools()));
        assert_eq!(a.config().max_iterations, 3);
        assert_eq!(runtime.provider().name(), "scripted");
    }
}
