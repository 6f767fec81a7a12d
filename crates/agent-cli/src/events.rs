//! Prints the agent's reasoning as it happens

use agent_runtime::react::redact_input;
use agent_runtime::{ChatResponse, ExecutorEventHandler, ReasoningStep};
use agent_tools::ToolOutput;
use async_trait::async_trait;
use serde_json::Value;

/// Longest observation echoed in full
const MAX_OBSERVATION_CHARS: usize = 400;

/// Writes each reasoning step to stderr, auth token masked
pub struct VerboseEventHandler;

#[async_trait]
impl ExecutorEventHandler for VerboseEventHandler {
    async fn on_step(&self, step: &ReasoningStep) {
        eprintln!("{}", render_step(step));
    }

    async fn on_tool_done(&self, output: &ToolOutput, duration_ms: u64) {
        let status = if output.is_error { "failed" } else { "ok" };
        eprintln!("  [{}: {status} in {duration_ms}ms]", output.tool_name);
    }

    async fn on_complete(&self, response: &ChatResponse) {
        eprintln!(
            "  [done: {:?}, {} tool call(s)]",
            response.termination,
            response.sources.len()
        );
    }

    async fn on_error(&self, error: &str) {
        eprintln!("  [error: {error}]");
    }
}

fn render_step(step: &ReasoningStep) -> String {
    match step {
        ReasoningStep::Action {
            thought,
            tool_name,
            input,
        } => format!(
            "Thought: {thought}\nAction: {tool_name}\nAction Input: {}",
            Value::Object(redact_input(input))
        ),
        ReasoningStep::Observation { content } => {
            format!("Observation: {}", truncate(content, MAX_OBSERVATION_CHARS))
        }
        ReasoningStep::FinalAnswer { thought, .. } => format!("Thought: {thought}"),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_masks_token() {
        let Value::Object(input) = json!({ "query": "SUI", "jwt_token": "secret" }) else {
            unreachable!()
        };
        let rendered = render_step(&ReasoningStep::Action {
            thought: "look it up".to_string(),
            tool_name: "search_token".to_string(),
            input,
        });
        assert!(rendered.contains("Action: search_token"));
        assert!(rendered.contains("\"jwt_token\":\"***\""));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(truncate("ééé", 2), "éé...");
    }
}
