//! Agent executor for running the ReAct loop
//!
//! The AgentExecutor implements the reasoning loop for one query:
//! 1. Format system header, chat history and reasoning so far
//! 2. Call the LLM
//! 3. Parse the completion into an action or a final answer
//! 4. On an action, run the tool and append its output as an observation
//! 5. Loop until an answer, the iteration cap, an aborting failure, or cancellation
//!
//! Calls are strictly sequential: one LLM call and at most one tool call per
//! iteration.

use crate::react::{
    ReActChatFormatter, ReActOutputParser, ReasoningStep, Session, redact_input, redact_text,
};
use agent_core::{Context, Error, Result};
use agent_llm::{CompletionRequest, LLMProvider, Message, StopReason};
use agent_prompt::PromptTemplate;
use agent_tools::{ToolOutput, ToolRegistry};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Response given when the iteration cap is reached without an answer
pub const CANNOT_ANSWER: &str = "Sorry, I cannot answer your query.";

/// Event handler for agent execution events
///
/// Implement this trait to receive callbacks during agent execution,
/// useful for showing the reasoning as it happens.
#[async_trait]
pub trait ExecutorEventHandler: Send + Sync {
    /// Called for every reasoning step as it is recorded
    async fn on_step(&self, _step: &ReasoningStep) {}

    /// Called when a tool execution starts (input has the auth token masked)
    async fn on_tool_start(&self, _name: &str, _input: &Value) {}

    /// Called when a tool execution completes
    async fn on_tool_done(&self, _output: &ToolOutput, _duration_ms: u64) {}

    /// Called when the query completes
    async fn on_complete(&self, _response: &ChatResponse) {}

    /// Called when an error ends the query
    async fn on_error(&self, _error: &str) {}
}

/// No-op event handler for when events are not needed
pub struct NoOpEventHandler;

#[async_trait]
impl ExecutorEventHandler for NoOpEventHandler {}

/// What happens when a tool call fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolFailurePolicy {
    /// Report the failure to the LLM as an observation and keep reasoning
    #[default]
    Observe,
    /// End the query through the error handler
    Abort,
}

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of LLM calls per query
    pub max_iterations: usize,

    /// Model to use
    pub model: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,

    /// Sequences that end a completion early
    pub stop_sequences: Vec<String>,

    /// Handling of failed tool calls
    pub tool_failure_policy: ToolFailurePolicy,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            model: "gemini-1.5-flash".to_string(),
            max_tokens: 2048,
            temperature: Some(0.7),
            // The LLM must not invent tool results
            stop_sequences: vec!["Observation:".to_string()],
            tool_failure_policy: ToolFailurePolicy::Observe,
        }
    }
}

impl ExecutorConfig {
    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::Configuration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(Error::Configuration("model must not be empty".to_string()));
        }
        Ok(())
    }
}

/// How a query ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The LLM produced a final answer
    Answered,
    /// The iteration cap was reached first
    IterationCap,
    /// A failure was turned into an error-handler response
    Aborted,
}

/// Result of one query
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Text returned to the user
    pub response: String,

    /// How the loop ended
    pub termination: Termination,

    /// Tool outputs produced while answering, in call order
    pub sources: Vec<ToolOutput>,
}

/// Executes the ReAct loop: LLM → parse → tool → observation → loop back
///
/// The executor only holds shared, read-only resources. All per-user state
/// lives in the [`Session`] passed to each call, so one executor can serve
/// many sessions concurrently.
#[derive(Clone)]
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    template: Arc<dyn PromptTemplate>,
    config: ExecutorConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tool_registry: Arc<ToolRegistry>,
        template: Arc<dyn PromptTemplate>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            template,
            config,
            event_handler: None,
        }
    }

    /// Create a new builder
    pub fn builder() -> AgentExecutorBuilder {
        AgentExecutorBuilder::new()
    }

    /// Set the event handler for receiving execution events
    pub fn with_event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Set the event handler (mutable reference version)
    pub fn set_event_handler(&mut self, handler: Arc<dyn ExecutorEventHandler>) {
        self.event_handler = Some(handler);
    }

    /// Get the executor configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Get the tool registry
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// Open a session for a context
    ///
    /// Fails with a configuration error if the prompt template needs a
    /// variable the context does not supply.
    pub fn session(&self, context: Context) -> Result<Session> {
        ReActChatFormatter::new(Arc::clone(&self.template), &context)?;
        Ok(Session::new(context))
    }

    /// Answer one query within a session
    pub async fn chat(&self, session: &mut Session, query: &str) -> Result<ChatResponse> {
        self.chat_with_cancel(session, query, &CancellationToken::new())
            .await
    }

    /// Answer one query, stopping early if `cancel` fires
    ///
    /// Loop failures (LLM errors, tool failures under
    /// [`ToolFailurePolicy::Abort`]) are reported as an error-handler
    /// response, not as `Err`. `Err` is returned only for configuration
    /// problems and for [`Error::Cancelled`]. The session's reasoning steps
    /// are cleared however the query ends; the history gains the query and
    /// response unless it was cancelled.
    pub async fn chat_with_cancel(
        &self,
        session: &mut Session,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<ChatResponse> {
        let handler = self.event_handler.clone();
        let formatter = ReActChatFormatter::new(Arc::clone(&self.template), session.context())?;
        let parser = ReActOutputParser::new(self.tool_registry.names());

        let mut history = session.chat_history().to_vec();
        history.push(Message::user(query));

        session.reset();
        let mut sources = Vec::new();

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            result = self.run_loop(
                session,
                &history,
                &formatter,
                &parser,
                &mut sources,
                handler.as_deref(),
            ) => result,
        };
        session.reset();

        let response = match outcome {
            Ok((response, termination)) => ChatResponse {
                response,
                termination,
                sources,
            },
            Err(Error::Cancelled) => {
                info!("Query cancelled");
                return Err(Error::Cancelled);
            }
            Err(e) => {
                warn!(error = %e, "Agent loop failed, reporting through error handler");
                if let Some(handler) = &handler {
                    handler.on_error(&e.to_string()).await;
                }
                let output = ToolOutput::error_handler(&e);
                let response = output.content.clone();
                sources.push(output);
                ChatResponse {
                    response,
                    termination: Termination::Aborted,
                    sources,
                }
            }
        };

        session.record_exchange(query, response.response.clone());
        if let Some(handler) = &handler {
            handler.on_complete(&response).await;
        }
        Ok(response)
    }

    async fn run_loop(
        &self,
        session: &mut Session,
        history: &[Message],
        formatter: &ReActChatFormatter,
        parser: &ReActOutputParser,
        sources: &mut Vec<ToolOutput>,
        handler: Option<&dyn ExecutorEventHandler>,
    ) -> Result<(String, Termination)> {
        let tools = self.tool_registry.definitions();

        for iteration in 1..=self.config.max_iterations {
            info!(
                iteration = iteration,
                max_iterations = self.config.max_iterations,
                "Agent iteration started"
            );

            let messages = formatter.format(&tools, history, session.steps())?;
            info!(
                model = %self.config.model,
                message_count = messages.len(),
                tool_count = tools.len(),
                "Sending request to LLM"
            );

            let response = self
                .provider
                .complete(self.build_request(messages))
                .await
                .map_err(|e| Error::Generic(e.to_string()))?;

            info!(
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "LLM response received"
            );
            if response.stop_reason == StopReason::MaxTokens {
                warn!(iteration = iteration, "Completion truncated by max_tokens");
            }

            let text = response.message.text();
            let response_preview: String = redact_text(text, session.context().auth_token())
                .chars()
                .take(300)
                .collect();
            debug!(response_preview = %response_preview, "LLM response content preview");

            let step = match parser.parse(text) {
                Ok(step) => step,
                Err(err) => {
                    warn!(iteration = iteration, error = %err, "Could not parse LLM output");
                    let observation =
                        ReasoningStep::observation(format!("Error: Could not parse output. {err}"));
                    record(session, observation, handler).await;
                    continue;
                }
            };
            record(session, step.clone(), handler).await;

            match step {
                ReasoningStep::FinalAnswer { answer, .. } => {
                    info!(
                        iteration = iteration,
                        response_length = answer.len(),
                        "Agent produced final answer"
                    );
                    return Ok((answer, Termination::Answered));
                }
                ReasoningStep::Action {
                    tool_name, input, ..
                } => {
                    let output = self.execute_tool(&tool_name, input, handler).await;
                    let failed = output.is_error;
                    let observation = ReasoningStep::observation(output.content.clone());
                    let content = output.content.clone();
                    sources.push(output);
                    record(session, observation, handler).await;

                    if failed && self.config.tool_failure_policy == ToolFailurePolicy::Abort {
                        return Err(Error::Generic(format!(
                            "Tool '{tool_name}' failed. {content}"
                        )));
                    }
                }
                // The parser only yields actions and answers
                ReasoningStep::Observation { .. } => {}
            }
        }

        warn!(
            max_iterations = self.config.max_iterations,
            "Max iterations reached without an answer"
        );
        Ok((CANNOT_ANSWER.to_string(), Termination::IterationCap))
    }

    fn build_request(&self, messages: Vec<Message>) -> CompletionRequest {
        let mut builder = CompletionRequest::builder(&self.config.model)
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .stop_sequences(self.config.stop_sequences.clone());
        if let Some(temperature) = self.config.temperature {
            builder = builder.temperature(temperature);
        }
        builder.build()
    }

    /// Run one tool; failures become error outputs, never `Err`
    async fn execute_tool(
        &self,
        name: &str,
        input: Map<String, Value>,
        handler: Option<&dyn ExecutorEventHandler>,
    ) -> ToolOutput {
        let redacted = Value::Object(redact_input(&input));
        let input_preview: String = redacted.to_string().chars().take(500).collect();
        info!(tool_name = %name, input_preview = %input_preview, "Executing tool");

        if let Some(handler) = handler {
            handler.on_tool_start(name, &redacted).await;
        }

        let Some(tool) = self.tool_registry.get(name) else {
            warn!(tool_name = %name, "Tool not found");
            return ToolOutput::error(name, format!("Tool not found: {name}"));
        };

        let start_time = Instant::now();
        let output = match tool.execute(Value::Object(input)).await {
            Ok(result) => ToolOutput::success(name, &result),
            Err(e) => ToolOutput::error(name, e),
        };
        let duration_ms = start_time.elapsed().as_millis() as u64;

        if output.is_error {
            warn!(
                tool_name = %name,
                duration_ms = duration_ms,
                error = %output.content,
                "Tool execution failed"
            );
        } else {
            let result_preview: String = output.content.chars().take(500).collect();
            info!(
                tool_name = %name,
                duration_ms = duration_ms,
                result_length = output.content.len(),
                result_preview = %result_preview,
                "Tool execution succeeded"
            );
        }

        if let Some(handler) = handler {
            handler.on_tool_done(&output, duration_ms).await;
        }
        output
    }
}

async fn record(
    session: &mut Session,
    step: ReasoningStep,
    handler: Option<&dyn ExecutorEventHandler>,
) {
    if let Some(handler) = handler {
        handler.on_step(&step).await;
    }
    session.push_step(step);
}

/// Builder for AgentExecutor
pub struct AgentExecutorBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tool_registry: Arc<ToolRegistry>,
    template: Option<Arc<dyn PromptTemplate>>,
    config: ExecutorConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
}

impl AgentExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            tool_registry: Arc::new(ToolRegistry::default()),
            template: None,
            config: ExecutorConfig::default(),
            event_handler: None,
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = registry;
        self
    }

    /// Set the system prompt template
    pub fn template(mut self, template: Arc<dyn PromptTemplate>) -> Self {
        self.template = Some(template);
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set maximum iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Set the tool failure policy
    pub fn tool_failure_policy(mut self, policy: ToolFailurePolicy) -> Self {
        self.config.tool_failure_policy = policy;
        self
    }

    /// Set the event handler
    pub fn event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Build the executor
    pub fn build(self) -> Result<AgentExecutor> {
        let provider = self
            .provider
            .ok_or_else(|| Error::InitializationFailed("Provider not set".to_string()))?;
        let template = self
            .template
            .ok_or_else(|| Error::InitializationFailed("Prompt template not set".to_string()))?;
        self.config.validate()?;

        Ok(AgentExecutor {
            provider,
            tool_registry: self.tool_registry,
            template,
            config: self.config,
            event_handler: self.event_handler,
        })
    }
}

impl Default for AgentExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use agent_llm::{CompletionResponse, LLMError, TokenUsage};
    use agent_prompt::JinjaTemplate;
    use agent_tools::Tool;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) const TEMPLATE: &str =
        "Tools:\n{{ tool_desc }}\nNames: {{ tool_names }}\njwt_token: {{ jwt_token }}";

    /// Replays canned completions and records every request
    pub(crate) struct ScriptedProvider {
        script: Mutex<VecDeque<agent_llm::Result<String>>>,
        pub(crate) requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        pub(crate) fn new<I: IntoIterator<Item = agent_llm::Result<String>>>(script: I) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn replies(replies: &[&str]) -> Self {
            Self::new(replies.iter().map(|r| Ok((*r).to_string())))
        }

        fn request(&self, i: usize) -> CompletionRequest {
            self.requests.lock().unwrap()[i].clone()
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn complete(&self, request: CompletionRequest) -> agent_llm::Result<CompletionResponse> {
            self.requests.lock().unwrap().push(request);
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LLMError::UnexpectedResponse("script exhausted".to_string())));
            next.map(|text| CompletionResponse {
                message: Message::assistant(text),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    /// Never completes
    struct StalledProvider;

    #[async_trait]
    impl LLMProvider for StalledProvider {
        async fn complete(&self, _request: CompletionRequest) -> agent_llm::Result<CompletionResponse> {
            std::future::pending().await
        }

        fn name(&self) -> &str {
            "stalled"
        }
    }

    pub(crate) struct PriceTool {
        pub(crate) calls: AtomicUsize,
    }

    #[async_trait]
    impl Tool for PriceTool {
        async fn execute(&self, params: Value) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let symbol = params["symbol"].as_str().unwrap_or("?");
            Ok(json!({ "symbol": symbol, "priceUsd": 1.25 }))
        }

        fn name(&self) -> &str {
            "get_price"
        }

        fn description(&self) -> &str {
            "Get the USD price of a token."
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object", "properties": { "symbol": { "type": "string" } } })
        }
    }

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        async fn execute(&self, _params: Value) -> Result<Value> {
            Err(Error::Generic("API error 500: upstream down".to_string()))
        }

        fn name(&self) -> &str {
            "broken"
        }

        fn description(&self) -> &str {
            "Always fails."
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object", "properties": {} })
        }
    }

    const ACTION: &str = "Thought: I need the price.\nAction: get_price\nAction Input: {\"symbol\": \"SUI\", \"jwt_token\": \"tok\"}";
    const ANSWER: &str = "Thought: I can answer without using any more tools.\nAnswer: SUI costs $1.25.";
    const BROKEN_ACTION: &str = "Thought: try it\nAction: broken\nAction Input: {}";

    fn executor(
        provider: Arc<ScriptedProvider>,
        tool: Arc<PriceTool>,
        config: ExecutorConfig,
    ) -> AgentExecutor {
        let registry = ToolRegistry::builder()
            .register(tool)
            .with_tool(BrokenTool)
            .build()
            .unwrap();
        AgentExecutor::builder()
            .provider(provider)
            .tool_registry(Arc::new(registry))
            .template(Arc::new(JinjaTemplate::new("system", TEMPLATE).unwrap()))
            .config(config)
            .build()
            .unwrap()
    }

    fn price_tool() -> Arc<PriceTool> {
        Arc::new(PriceTool {
            calls: AtomicUsize::new(0),
        })
    }

    fn context() -> Context {
        Context::new().with_auth_token("tok")
    }

    #[tokio::test]
    async fn test_direct_answer() {
        let provider = Arc::new(ScriptedProvider::replies(&[ANSWER]));
        let executor = executor(provider.clone(), price_tool(), ExecutorConfig::default());
        let mut session = executor.session(context()).unwrap();

        let response = executor.chat(&mut session, "price of SUI?").await.unwrap();
        assert_eq!(response.response, "SUI costs $1.25.");
        assert_eq!(response.termination, Termination::Answered);
        assert!(response.sources.is_empty());
        assert!(session.steps().is_empty());
        assert_eq!(session.chat_history().len(), 2);

        let request = provider.request(0);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, agent_llm::Role::System);
        assert!(request.messages[0].text().contains("jwt_token: tok"));
        assert!(request.messages[0].text().contains("Names: get_price, broken"));
        assert_eq!(request.messages[1], Message::user("price of SUI?"));
        assert_eq!(request.stop_sequences, Some(vec!["Observation:".to_string()]));
    }

    #[tokio::test]
    async fn test_action_then_answer() {
        let provider = Arc::new(ScriptedProvider::replies(&[ACTION, ANSWER]));
        let tool = price_tool();
        let executor = executor(provider.clone(), tool.clone(), ExecutorConfig::default());
        let mut session = executor.session(context()).unwrap();

        let response = executor.chat(&mut session, "price of SUI?").await.unwrap();
        assert_eq!(response.termination, Termination::Answered);
        assert_eq!(tool.calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.sources.len(), 1);
        assert_eq!(response.sources[0].tool_name, "get_price");

        let second = provider.request(1);
        let roles: Vec<_> = second.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                agent_llm::Role::System,
                agent_llm::Role::User,
                agent_llm::Role::Assistant,
                agent_llm::Role::User
            ]
        );
        let observation = second.messages[3].text();
        assert!(observation.starts_with("Observation: {"));
        assert!(observation.contains("\"priceUsd\":1.25"));
    }

    #[tokio::test]
    async fn test_iteration_cap_after_one_dispatch() {
        let provider = Arc::new(ScriptedProvider::replies(&[ACTION, ANSWER]));
        let tool = price_tool();
        let config = ExecutorConfig {
            max_iterations: 1,
            ..ExecutorConfig::default()
        };
        let executor = executor(provider.clone(), tool.clone(), config);
        let mut session = executor.session(context()).unwrap();

        let response = executor.chat(&mut session, "price of SUI?").await.unwrap();
        assert_eq!(response.response, CANNOT_ANSWER);
        assert_eq!(response.termination, Termination::IterationCap);
        assert_eq!(tool.calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.requests.lock().unwrap().len(), 1);
        assert!(session.steps().is_empty());
    }

    #[tokio::test]
    async fn test_parse_error_becomes_observation() {
        let provider = Arc::new(ScriptedProvider::replies(&["SUI is $1.25", ANSWER]));
        let executor = executor(provider.clone(), price_tool(), ExecutorConfig::default());
        let mut session = executor.session(context()).unwrap();

        let response = executor.chat(&mut session, "price?").await.unwrap();
        assert_eq!(response.termination, Termination::Answered);

        let second = provider.request(1);
        let last = second.messages.last().unwrap();
        assert_eq!(last.role, agent_llm::Role::User);
        assert_eq!(
            last.text(),
            "Observation: Error: Could not parse output. The output must start with 'Thought:'."
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_not_dispatched() {
        let provider = Arc::new(ScriptedProvider::replies(&[
            "Thought: t\nAction: get_balance\nAction Input: {}",
            ANSWER,
        ]));
        let tool = price_tool();
        let executor = executor(provider.clone(), tool.clone(), ExecutorConfig::default());
        let mut session = executor.session(context()).unwrap();

        executor.chat(&mut session, "balance?").await.unwrap();
        assert_eq!(tool.calls.load(Ordering::SeqCst), 0);
        let second = provider.request(1);
        assert!(second.messages.last().unwrap().text().contains("Unknown tool 'get_balance'"));
    }

    #[tokio::test]
    async fn test_tool_failure_observed() {
        let provider = Arc::new(ScriptedProvider::replies(&[BROKEN_ACTION, ANSWER]));
        let executor = executor(provider.clone(), price_tool(), ExecutorConfig::default());
        let mut session = executor.session(context()).unwrap();

        let response = executor.chat(&mut session, "q").await.unwrap();
        assert_eq!(response.termination, Termination::Answered);
        assert!(response.sources[0].is_error);
        assert_eq!(
            provider.request(1).messages.last().unwrap().text(),
            "Observation: Error: API error 500: upstream down"
        );
    }

    #[tokio::test]
    async fn test_tool_failure_aborts_under_abort_policy() {
        let provider = Arc::new(ScriptedProvider::replies(&[BROKEN_ACTION, ANSWER]));
        let config = ExecutorConfig {
            tool_failure_policy: ToolFailurePolicy::Abort,
            ..ExecutorConfig::default()
        };
        let executor = executor(provider.clone(), price_tool(), config);
        let mut session = executor.session(context()).unwrap();

        let response = executor.chat(&mut session, "q").await.unwrap();
        assert_eq!(response.termination, Termination::Aborted);
        assert_eq!(
            response.response,
            "The agent encountered an error: Tool 'broken' failed. Error: API error 500: upstream down"
        );
        assert_eq!(response.sources.len(), 2);
        assert_eq!(response.sources[1].tool_name, "Error Handler");
        assert_eq!(provider.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_llm_error_goes_through_error_handler() {
        let provider = Arc::new(ScriptedProvider::new([Err(LLMError::RateLimitExceeded(
            "quota".to_string(),
        ))]));
        let executor = executor(provider, price_tool(), ExecutorConfig::default());
        let mut session = executor.session(context()).unwrap();

        let response = executor.chat(&mut session, "q").await.unwrap();
        assert_eq!(response.termination, Termination::Aborted);
        assert_eq!(
            response.response,
            "The agent encountered an error: Rate limit exceeded: quota"
        );
        assert!(session.steps().is_empty());
    }

    #[tokio::test]
    async fn test_history_carries_over() {
        let provider = Arc::new(ScriptedProvider::replies(&[ANSWER, ANSWER]));
        let executor = executor(provider.clone(), price_tool(), ExecutorConfig::default());
        let mut session = executor.session(context()).unwrap();

        executor.chat(&mut session, "first").await.unwrap();
        executor.chat(&mut session, "second").await.unwrap();

        let second = provider.request(1);
        assert_eq!(second.messages.len(), 4);
        assert_eq!(second.messages[1], Message::user("first"));
        assert_eq!(second.messages[2], Message::assistant("SUI costs $1.25."));
        assert_eq!(second.messages[3], Message::user("second"));
    }

    #[tokio::test]
    async fn test_cancellation() {
        let registry = ToolRegistry::builder().build().unwrap();
        let executor = AgentExecutor::builder()
            .provider(Arc::new(StalledProvider))
            .tool_registry(Arc::new(registry))
            .template(Arc::new(JinjaTemplate::new("system", TEMPLATE).unwrap()))
            .build()
            .unwrap();
        let mut session = executor.session(context()).unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = executor
            .chat_with_cancel(&mut session, "q", &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        assert!(session.steps().is_empty());
        assert!(session.chat_history().is_empty());
    }

    #[test]
    fn test_session_requires_template_variables() {
        let provider = Arc::new(ScriptedProvider::replies(&[]));
        let executor = executor(provider, price_tool(), ExecutorConfig::default());

        let err = executor.session(Context::new()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_builder_validation() {
        let result = AgentExecutor::builder()
            .provider(Arc::new(ScriptedProvider::replies(&[])))
            .template(Arc::new(JinjaTemplate::new("system", TEMPLATE).unwrap()))
            .max_iterations(0)
            .build();
        assert!(matches!(result, Err(Error::Configuration(_))));

        let result = AgentExecutor::builder().build();
        assert!(matches!(result, Err(Error::InitializationFailed(_))));
    }

    /// In-memory sink for captured log output
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_auth_token_never_logged() {
        const SECRET: &str = "SECRET-JWT-123";
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let action = format!(
            "Thought: I need the price.\nAction: get_price\nAction Input: {{\"symbol\": \"SUI\", \"jwt_token\": \"{SECRET}\"}}"
        );
        let provider = Arc::new(ScriptedProvider::replies(&[action.as_str(), ANSWER]));
        let tool = price_tool();
        let executor = executor(provider, tool.clone(), ExecutorConfig::default());
        let mut session = executor
            .session(Context::new().with_auth_token(SECRET))
            .unwrap();

        let response = executor.chat(&mut session, "price of SUI?").await.unwrap();
        assert_eq!(response.termination, Termination::Answered);
        assert_eq!(tool.calls.load(Ordering::SeqCst), 1);

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("LLM response content preview"));
        assert!(output.contains("Executing tool"));
        assert!(!output.contains(SECRET));
    }

    #[test]
    fn test_default_config() {
        let config = ExecutorConfig::default();
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.stop_sequences, vec!["Observation:"]);
        assert_eq!(config.tool_failure_policy, ToolFailurePolicy::Observe);
    }
}
