//! Reasoning steps of a single query

use agent_core::context::keys;
use agent_llm::Message;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One step of the ReAct reasoning sequence
///
/// Steps render back to the same text protocol the LLM writes, so earlier
/// reasoning can be replayed to it on the next turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReasoningStep {
    /// The LLM decided to call a tool
    Action {
        thought: String,
        tool_name: String,
        input: Map<String, Value>,
    },

    /// Result of a tool call, or a description of why the last output was rejected
    Observation { content: String },

    /// The LLM produced its answer; nothing follows this step
    FinalAnswer { thought: String, answer: String },
}

impl ReasoningStep {
    /// Observation step
    pub fn observation(content: impl Into<String>) -> Self {
        Self::Observation {
            content: content.into(),
        }
    }

    /// Whether this step is an observation
    pub fn is_observation(&self) -> bool {
        matches!(self, Self::Observation { .. })
    }

    /// Chat message for this step
    ///
    /// Observations come from outside the LLM and are sent as user turns;
    /// everything else is the LLM's own output and goes back as assistant turns.
    pub fn to_message(&self) -> Message {
        if self.is_observation() {
            Message::user(self.to_string())
        } else {
            Message::assistant(self.to_string())
        }
    }
}

impl fmt::Display for ReasoningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action {
                thought,
                tool_name,
                input,
            } => {
                let input = serde_json::to_string(input).map_err(|_| fmt::Error)?;
                write!(
                    f,
                    "Thought: {thought}\nAction: {tool_name}\nAction Input: {input}"
                )
            }
            Self::Observation { content } => write!(f, "Observation: {content}"),
            Self::FinalAnswer { thought, answer } => {
                write!(f, "Thought: {thought}\nAnswer: {answer}")
            }
        }
    }
}

/// Copy of tool input safe to log or print: the auth token is masked
pub fn redact_input(input: &Map<String, Value>) -> Map<String, Value> {
    let mut redacted = input.clone();
    if let Some(token) = redacted.get_mut(keys::AUTH_TOKEN) {
        *token = Value::String("***".to_string());
    }
    redacted
}

/// Copy of free text safe to log: every occurrence of `token` is masked
pub fn redact_text(text: &str, token: Option<&str>) -> String {
    match token.filter(|token| !token.is_empty()) {
        Some(token) => text.replace(token, "***"),
        None => text.to_string(),
    }
}
