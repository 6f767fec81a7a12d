//! Assembles the message list sent to the LLM on every turn

use super::step::ReasoningStep;
use agent_core::{Context, Result};
use agent_llm::{Message, ToolDefinition};
use agent_prompt::PromptTemplate;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Placeholder receiving one `name: description` line per tool
pub const TOOL_DESC: &str = "tool_desc";
/// Placeholder receiving the comma-separated tool names
pub const TOOL_NAMES: &str = "tool_names";

/// Formats the system header, chat history and reasoning into chat messages
///
/// A formatter is bound to one session's [`Context`]. Construction checks
/// that the template references nothing beyond the tool placeholders and the
/// variables that context supplies, so rendering cannot hit a missing
/// placeholder later.
pub struct ReActChatFormatter {
    template: Arc<dyn PromptTemplate>,
    context_vars: Map<String, Value>,
}

impl ReActChatFormatter {
    /// Bind a template to a session context
    ///
    /// Fails with a configuration error if the template needs a variable
    /// that is not supplied.
    pub fn new(template: Arc<dyn PromptTemplate>, context: &Context) -> Result<Self> {
        let context_vars = context.template_variables();

        let mut supplied: Vec<&str> = vec![TOOL_DESC, TOOL_NAMES];
        supplied.extend(context_vars.keys().map(String::as_str));
        template.check_variables(&supplied)?;

        Ok(Self {
            template,
            context_vars,
        })
    }

    /// Ordered messages: system header, history as given, then reasoning steps
    pub fn format(
        &self,
        tools: &[ToolDefinition],
        chat_history: &[Message],
        reasoning: &[ReasoningStep],
    ) -> Result<Vec<Message>> {
        let mut messages = Vec::with_capacity(1 + chat_history.len() + reasoning.len());
        messages.push(self.system_message(tools)?);
        messages.extend(chat_history.iter().cloned());
        messages.extend(reasoning.iter().map(ReasoningStep::to_message));
        Ok(messages)
    }

    /// Render only the system header
    pub fn system_message(&self, tools: &[ToolDefinition]) -> Result<Message> {
        let mut vars = self.context_vars.clone();
        vars.insert(TOOL_DESC.to_string(), Value::String(tool_desc(tools)));
        vars.insert(TOOL_NAMES.to_string(), Value::String(tool_names(tools)));

        let header = self.template.render(&Value::Object(vars))?;
        Ok(Message::system(header))
    }
}

impl std::fmt::Debug for ReActChatFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReActChatFormatter")
            .field("template", &self.template.name())
            .field("context_vars", &self.context_vars.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// One `name: description` line per tool, descriptions collapsed to one line
pub fn tool_desc(tools: &[ToolDefinition]) -> String {
    tools
        .iter()
        .map(|tool| {
            let description = tool.description.split_whitespace().collect::<Vec<_>>().join(" ");
            format!("{}: {description}", tool.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tool names joined with `", "`
pub fn tool_names(tools: &[ToolDefinition]) -> String {
    tools
        .iter()
        .map(|tool| tool.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
