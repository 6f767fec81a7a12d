//! Core prompt template trait
//!
//! This module defines the [`PromptTemplate`] trait that all template implementations must follow.

use crate::{PromptError, Result};
use std::collections::BTreeSet;

/// Core trait for prompt templates
///
/// A template knows which placeholders it references, so callers can check
/// that they supply every one of them before rendering anything.
///
/// This trait is dyn-compatible, using `serde_json::Value` for variables instead of generics.
pub trait PromptTemplate: Send + Sync {
    /// Get the template name/identifier
    fn name(&self) -> &str;

    /// Placeholder names the template references
    fn required_variables(&self) -> &BTreeSet<String>;

    /// Render the template with variables
    ///
    /// Fails if a referenced variable is missing or rendering fails.
    fn render(&self, vars: &serde_json::Value) -> Result<String>;

    /// Get raw template source (for debugging/inspection)
    fn raw_template(&self) -> &str;

    /// Check that `supplied` covers every required placeholder
    fn check_variables(&self, supplied: &[&str]) -> Result<()> {
        let missing: Vec<String> = self
            .required_variables()
            .iter()
            .filter(|var| !supplied.contains(&var.as_str()))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(PromptError::MissingVariables {
                name: self.name().to_string(),
                missing,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed {
        required: BTreeSet<String>,
    }

    impl PromptTemplate for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn required_variables(&self) -> &BTreeSet<String> {
            &self.required
        }

        fn render(&self, _vars: &serde_json::Value) -> Result<String> {
            Ok("fixed".to_string())
        }

        fn raw_template(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_check_variables() {
        let template = Fixed {
            required: ["a", "b"].iter().map(|s| (*s).to_string()).collect(),
        };

        assert!(template.check_variables(&["a", "b", "c"]).is_ok());

        let err = template.check_variables(&["a"]).unwrap_err();
        assert!(matches!(err, PromptError::MissingVariables { missing, .. } if missing == vec!["b"]));
        assert_eq!(template.render(&json!({})).unwrap(), "fixed");
    }
}
