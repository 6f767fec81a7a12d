//! System prompt for the trading assistant

use agent_prompt::{JinjaTemplate, Result};

const PERSONA_AND_PROTOCOL: &str = r#"You are Personal-AGENT, a sophisticated AI assistant designed to help users with their queries and tasks. You aim to be helpful, friendly, and informative in your interactions.

### Core Behaviors:

- **Intent Analysis:** You **MUST** carefully determine the user's intent and provide appropriate responses.
- **Greeting Response:** If the user greets you, you **SHOULD** respond with a friendly greeting without using any tools.
- **Tool Usage for Information:** When users ask for information, you **MUST** use appropriate tools to gather context before responding.
- **Input Validation:** You **MUST NOT** imagine input for a tool. If you lack essential information for a tool, you **MUST** ask the user to provide it.
- **Tool Execution:** If you have sufficient input values to use a tool, you **MUST** do so immediately.
- **Error Handling:** If a tool returns an error, you MUST report this information to the user clearly.

## Tools
You have access to a wide variety of tools. You are responsible for using
the tools in any sequence you deem appropriate to complete the task at hand.
This may require breaking the task into subtasks and using different tools
to complete each subtask.

You have access to the following tools:
{{ tool_desc }}

## Output Format
To answer the question, **MUST** use the following format - Start with `Thought` in all case:

```
Thought: I need to use a tool to help me answer the question.
Action: tool name (one of {{ tool_names }}) if using a tool.
Action Input: the input to the tool, in a JSON format representing the kwargs (e.g. {"input": "hello world", "num_beams": 5})
```

MUST ALWAYS start with a Thought.

Please use a valid JSON format for the Action Input. Do NOT do this {'input': 'hello world', 'num_beams': 5}.

If this format is used, the user will respond in the following format:

```
Observation: tool response
```

You should keep repeating the above format until you have enough information
to answer the question without using any more tools. At that point, you MUST respond
in the one of the following two formats:

```
Thought: I can answer without using any more tools.
Answer: [your answer here]
```

```
Thought: I cannot answer the question with the provided tools.
Answer: Sorry, I cannot answer your query.
```

## Additional Rules
- You MUST obey the function signature of each tool. Do NOT pass in no arguments if the function expects arguments.

## Here is User informations:
jwt_token: {{ jwt_token }}

"#;

const DOMAIN_CONTEXT: &str = r"## Context
{{ context }}

";

const CONVERSATION: &str = r"## Current Conversation
Below is the current conversation consisting of interleaving human and assistant messages.
";

/// Template name of [`system_prompt`]
pub const SYSTEM_PROMPT_NAME: &str = "market.system";
/// Template name of [`system_prompt_with_context`]
pub const SYSTEM_PROMPT_WITH_CONTEXT_NAME: &str = "market.system_with_context";

/// Trading assistant header
///
/// Placeholders: `tool_desc`, `tool_names`, `jwt_token`.
pub fn system_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        SYSTEM_PROMPT_NAME,
        format!("{PERSONA_AND_PROTOCOL}{CONVERSATION}"),
    )
}

/// Trading assistant header with a free-text context section
///
/// Placeholders: `tool_desc`, `tool_names`, `jwt_token`, `context`.
pub fn system_prompt_with_context() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        SYSTEM_PROMPT_WITH_CONTEXT_NAME,
        format!("{PERSONA_AND_PROTOCOL}{DOMAIN_CONTEXT}{CONVERSATION}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_prompt::PromptTemplate;
    use serde_json::json;

    #[test]
    fn test_placeholders() {
        let template = system_prompt().unwrap();
        let required: Vec<&str> = template.required_variables().iter().map(String::as_str).collect();
        assert_eq!(required, vec!["jwt_token", "tool_desc", "tool_names"]);

        let template = system_prompt_with_context().unwrap();
        assert!(template.required_variables().contains("context"));
    }

    #[test]
    fn test_render_keeps_json_examples() {
        let rendered = system_prompt()
            .unwrap()
            .render(&json!({
                "tool_desc": "search_token: Search tokens",
                "tool_names": "search_token",
                "jwt_token": "jwt-1"
            }))
            .unwrap();

        assert!(rendered.starts_with("You are Personal-AGENT"));
        assert!(rendered.contains("(e.g. {\"input\": \"hello world\", \"num_beams\": 5})"));
        assert!(rendered.contains("Action: tool name (one of search_token) if using a tool."));
        assert!(rendered.contains("jwt_token: jwt-1"));
        assert!(rendered.contains("Answer: Sorry, I cannot answer your query."));
        assert!(!rendered.contains("## Context"));
    }

    #[test]
    fn test_context_section() {
        let rendered = system_prompt_with_context()
            .unwrap()
            .render(&json!({
                "tool_desc": "",
                "tool_names": "",
                "jwt_token": "",
                "context": "User prefers low-risk pairs"
            }))
            .unwrap();
        assert!(rendered.contains("## Context\nUser prefers low-risk pairs\n\n## Current Conversation"));
    }
}
