//! Tool trait definition

use agent_core::Result;
use agent_llm::ToolDefinition;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for tools that agents can execute
///
/// Tools are functions that LLM agents can call to interact with the world.
/// Each tool must provide a name, description, and JSON schema for its input.
/// Tools are stateless with respect to sessions: per-user data such as an
/// auth token arrives through the call arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// # Arguments
    ///
    /// * `params` - Tool input as a JSON object (should match input_schema)
    ///
    /// # Returns
    ///
    /// Tool output as JSON value. A string value is shown to the LLM as-is;
    /// anything else is shown as JSON text.
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry. The LLM refers to the tool by
    /// this exact name in its `Action:` line.
    fn name(&self) -> &str;

    /// Get the tool's description
    ///
    /// Listed in the system prompt; this is how the LLM learns when to use
    /// the tool.
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    ///
    /// let schema = json!({
    ///     "type": "object",
    ///     "properties": {
    ///         "query": { "type": "string" },
    ///         "jwt_token": { "type": "string" }
    ///     },
    ///     "required": ["query"]
    /// });
    /// ```
    fn input_schema(&self) -> Value;

    /// Descriptor of this tool as listed to the LLM
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema())
    }
}
