//! MiniJinja-based template implementation
//!
//! This module provides a [`JinjaTemplate`] implementation that uses the MiniJinja
//! template engine for variable interpolation and conditional rendering.
//! Rendering is strict: referencing a variable that was not supplied is an
//! error instead of an empty string.

use crate::{PromptError, PromptTemplate, Result};
use minijinja::{Environment, UndefinedBehavior};
use std::collections::BTreeSet;

/// A prompt template backed by MiniJinja
///
/// The template is parsed once at construction, which also records the set
/// of placeholders it references.
///
/// # Template Syntax
///
/// The template uses standard Jinja2 syntax:
/// - Variables: `{{ variable }}`
/// - Filters: `{{ name | upper }}`
/// - Conditionals: `{% if condition %}...{% endif %}`
/// - Loops: `{% for item in items %}...{% endfor %}`
///
/// Literal braces that are not doubled (such as JSON examples in a prompt)
/// pass through unchanged.
///
/// # Examples
///
/// ```
/// use agent_prompt::{JinjaTemplate, PromptTemplate};
/// use serde_json::json;
///
/// let template = JinjaTemplate::new("greeting", "Hello, {{ name }}!").unwrap();
/// assert!(template.required_variables().contains("name"));
///
/// let result = template.render(&json!({ "name": "World" })).unwrap();
/// assert_eq!(result, "Hello, World!");
/// ```
pub struct JinjaTemplate {
    name: String,
    source: String,
    required: BTreeSet<String>,
}

impl JinjaTemplate {
    /// Parse a template
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::TemplateParseFailed`] if the source is not valid Jinja.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let source = source.into();

        let required = {
            let env = environment();
            let template =
                env.template_from_str(&source)
                    .map_err(|e| PromptError::TemplateParseFailed {
                        name: name.clone(),
                        detail: e.to_string(),
                    })?;
            template.undeclared_variables(false).into_iter().collect()
        };

        Ok(Self {
            name,
            source,
            required,
        })
    }
}

fn environment<'source>() -> Environment<'source> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}

impl PromptTemplate for JinjaTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_variables(&self) -> &BTreeSet<String> {
        &self.required
    }

    fn render(&self, vars: &serde_json::Value) -> Result<String> {
        let value = minijinja::Value::from_serialize(vars);

        environment()
            .render_str(&self.source, value)
            .map_err(|e| PromptError::RenderError {
                name: self.name.clone(),
                detail: e.to_string(),
            })
    }

    fn raw_template(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Debug for JinjaTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaTemplate")
            .field("name", &self.name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_template() {
        let template = JinjaTemplate::new("test", "Hello, {{ name }}!").unwrap();

        let result = template.render(&json!({ "name": "World" })).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_required_variables() {
        let template = JinjaTemplate::new(
            "system",
            "Tools:\n{{ tool_desc }}\nUse one of [{{ tool_names }}].\n{% for x in items %}{{ x }}{% endfor %}",
        )
        .unwrap();

        let required: Vec<&str> = template.required_variables().iter().map(String::as_str).collect();
        assert_eq!(required, vec!["items", "tool_desc", "tool_names"]);
    }

    #[test]
    fn test_strict_undefined_fails() {
        let template = JinjaTemplate::new("test", "token: {{ jwt_token }}").unwrap();

        let err = template.render(&json!({})).unwrap_err();
        assert!(matches!(err, PromptError::RenderError { .. }));
    }

    #[test]
    fn test_json_braces_pass_through() {
        let template = JinjaTemplate::new(
            "json",
            r#"Action Input: {"query": "SUI", "jwt_token": "{{ jwt_token }}"}"#,
        )
        .unwrap();

        let result = template.render(&json!({ "jwt_token": "abc" })).unwrap();
        assert_eq!(result, r#"Action Input: {"query": "SUI", "jwt_token": "abc"}"#);
    }

    #[test]
    fn test_invalid_template_error() {
        let result = JinjaTemplate::new("test", "{{ unclosed");
        assert!(matches!(result, Err(PromptError::TemplateParseFailed { .. })));
    }

    #[test]
    fn test_conditional() {
        let template = JinjaTemplate::new(
            "conditional",
            r"{% if detailed %}Detailed analysis{% else %}Brief analysis{% endif %}",
        )
        .unwrap();

        let detailed = template.render(&json!({ "detailed": true })).unwrap();
        assert_eq!(detailed, "Detailed analysis");

        let brief = template.render(&json!({ "detailed": false })).unwrap();
        assert_eq!(brief, "Brief analysis");
    }

    #[test]
    fn test_multiline_template() {
        let template = JinjaTemplate::new(
            "system",
            r"You are a helpful assistant.

Your name is {{ name }}.
Your role is {{ role }}.",
        )
        .unwrap();

        let result = template
            .render(&json!({ "name": "Personal-AGENT", "role": "trader" }))
            .unwrap();

        assert!(result.contains("Personal-AGENT"));
        assert!(result.contains("trader"));
        assert_eq!(template.raw_template().lines().count(), 4);
    }

    #[test]
    fn test_debug() {
        let template = JinjaTemplate::new("test", "Hello").unwrap();
        let debug = format!("{template:?}");
        assert!(debug.contains("JinjaTemplate"));
        assert!(debug.contains("test"));
    }
}
