//! Per-user conversation state

use super::step::ReasoningStep;
use agent_core::Context;
use agent_llm::Message;

/// State owned by one user session
///
/// Chat history persists across queries. Reasoning steps belong to the
/// query in flight and are cleared whenever a query ends, however it ends.
#[derive(Debug, Clone, Default)]
pub struct Session {
    context: Context,
    chat_history: Vec<Message>,
    steps: Vec<ReasoningStep>,
}

impl Session {
    /// New session bound to a context
    pub fn new(context: Context) -> Self {
        Self {
            context,
            chat_history: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Context injected into every prompt of this session
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Completed exchanges, oldest first
    pub fn chat_history(&self) -> &[Message] {
        &self.chat_history
    }

    /// Reasoning steps of the current query
    pub fn steps(&self) -> &[ReasoningStep] {
        &self.steps
    }

    pub(crate) fn push_step(&mut self, step: ReasoningStep) {
        self.steps.push(step);
    }

    /// Clear the current query's reasoning steps
    pub fn reset(&mut self) {
        self.steps.clear();
    }

    /// Append a finished query and its response to the history
    pub fn record_exchange(&mut self, query: impl Into<String>, response: impl Into<String>) {
        self.chat_history.push(Message::user(query));
        self.chat_history.push(Message::assistant(response));
    }

    /// Forget the chat history
    pub fn clear_history(&mut self) {
        self.chat_history.clear();
        self.steps.clear();
    }
}
