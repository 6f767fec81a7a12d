//! Result of a single tool invocation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Name reported for outputs produced by the top-level failure handler
pub const ERROR_HANDLER: &str = "Error Handler";

/// Output of one tool call, appended to the reasoning as an observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Name of the tool that produced this output
    pub tool_name: String,

    /// Text shown to the LLM
    pub content: String,

    /// Whether the call failed
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful output from a tool's JSON result
    ///
    /// String results are used verbatim, other values are serialized.
    pub fn success(tool_name: impl Into<String>, value: &Value) -> Self {
        let content = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        Self {
            tool_name: tool_name.into(),
            content,
            is_error: false,
        }
    }

    /// Failed output; content is `Error: <message>`
    pub fn error(tool_name: impl Into<String>, message: impl fmt::Display) -> Self {
        Self {
            tool_name: tool_name.into(),
            content: format!("Error: {message}"),
            is_error: true,
        }
    }

    /// Output attributed to the top-level failure handler
    pub fn error_handler(message: impl fmt::Display) -> Self {
        Self {
            tool_name: ERROR_HANDLER.to_string(),
            content: format!("The agent encountered an error: {message}"),
            is_error: true,
        }
    }
}

impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}
