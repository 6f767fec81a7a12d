//! Tool descriptors exposed to the LLM

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Describes a tool the LLM may call
///
/// The ReAct prompt lists tools by name and description, so both are part of
/// the protocol surface. The input schema documents the argument names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (unique within a registry)
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON schema for the tool's input parameters
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Helper module to build JSON schemas for tools
pub mod schema {
    use serde_json::{Value, json};

    /// Create a JSON schema for an object with properties
    ///
    /// # Example
    ///
    /// ```
    /// use agent_llm::tools::schema;
    /// use serde_json::json;
    ///
    /// let schema = schema::object(
    ///     json!({
    ///         "query": schema::string("Token name, symbol, or ticker"),
    ///         "limit": schema::integer_with_default("Maximum results", 5),
    ///     }),
    ///     &["query"],
    /// );
    /// assert_eq!(schema["required"][0], "query");
    /// ```
    pub fn object(properties: Value, required: &[&str]) -> Value {
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// String property schema
    pub fn string(description: &str) -> Value {
        json!({
            "type": "string",
            "description": description,
        })
    }

    /// String property restricted to a set of values, with a default
    pub fn string_enum(description: &str, values: &[&str], default: &str) -> Value {
        json!({
            "type": "string",
            "description": description,
            "enum": values,
            "default": default,
        })
    }

    /// Integer property schema with a default
    pub fn integer_with_default(description: &str, default: u64) -> Value {
        json!({
            "type": "integer",
            "description": description,
            "default": default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_definition_creation() {
        let schema = schema::object(
            json!({
                "query": schema::string("Search query"),
                "jwt_token": schema::string("User's authorization token"),
            }),
            &["query"],
        );

        let tool = ToolDefinition::new("search_token", "Search tokens", schema.clone());
        assert_eq!(tool.name, "search_token");
        assert_eq!(tool.description, "Search tokens");
        assert_eq!(tool.input_schema, schema);
        assert_eq!(tool.input_schema["required"], json!(["query"]));
    }

    #[test]
    fn test_schema_builders() {
        let str_schema = schema::string("test");
        assert_eq!(str_schema["type"], "string");

        let int_schema = schema::integer_with_default("count", 5);
        assert_eq!(int_schema["type"], "integer");
        assert_eq!(int_schema["default"], 5);

        let enum_schema = schema::string_enum("res", &["5m", "1h"], "5m");
        assert_eq!(enum_schema["enum"], json!(["5m", "1h"]));
    }
}
