//! Per-session context injected into agent prompts
//!
//! The `Context` struct carries the values a session binds into the system
//! prompt on every turn: the caller's auth token and an optional free-text
//! domain context. The set of fields is closed; templates reference them by
//! the placeholder names in [`keys`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder names under which context fields are exposed to templates
pub mod keys {
    /// The caller's opaque authorization token
    pub const AUTH_TOKEN: &str = "jwt_token";
    /// Free-text domain context
    pub const DOMAIN_CONTEXT: &str = "context";
}

/// Context bound to one session
///
/// # Example
///
/// ```
/// use agent_core::Context;
///
/// let ctx = Context::new()
///     .with_auth_token("eyJhbGciOi...")
///     .with_domain_context("User trades on the SUI network");
///
/// assert_eq!(ctx.auth_token(), Some("eyJhbGciOi..."));
/// assert!(ctx.template_variables().contains_key("jwt_token"));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// User authorization token, passed through to tools that need it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,

    /// Optional domain context rendered into the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    domain_context: Option<String>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the auth token
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the domain context
    pub fn with_domain_context(mut self, context: impl Into<String>) -> Self {
        self.domain_context = Some(context.into());
        self
    }

    /// Get the auth token
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// Get the domain context
    pub fn domain_context(&self) -> Option<&str> {
        self.domain_context.as_deref()
    }

    /// Variables this context supplies to a template, keyed by placeholder name
    ///
    /// Only fields that are set (and, for the domain context, non-empty) are
    /// included, so a template that needs a missing field fails validation.
    pub fn template_variables(&self) -> Map<String, Value> {
        let mut vars = Map::new();
        if let Some(token) = &self.auth_token {
            vars.insert(keys::AUTH_TOKEN.to_string(), Value::String(token.clone()));
        }
        if let Some(context) = self.domain_context.as_ref().filter(|c| !c.is_empty()) {
            vars.insert(
                keys::DOMAIN_CONTEXT.to_string(),
                Value::String(context.clone()),
            );
        }
        vars
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("domain_context", &self.domain_context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context() {
        let ctx = Context::new();
        assert_eq!(ctx.auth_token(), None);
        assert_eq!(ctx.domain_context(), None);
        assert!(ctx.template_variables().is_empty());
    }

    #[test]
    fn test_builder_chain() {
        let ctx = Context::new()
            .with_auth_token("token-123")
            .with_domain_context("SUI trading");

        assert_eq!(ctx.auth_token(), Some("token-123"));
        assert_eq!(ctx.domain_context(), Some("SUI trading"));

        let vars = ctx.template_variables();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[keys::AUTH_TOKEN], "token-123");
        assert_eq!(vars[keys::DOMAIN_CONTEXT], "SUI trading");
    }

    #[test]
    fn test_empty_domain_context_is_not_supplied() {
        let ctx = Context::new().with_domain_context("");
        assert!(!ctx.template_variables().contains_key(keys::DOMAIN_CONTEXT));
    }

    #[test]
    fn test_debug_redacts_token() {
        let ctx = Context::new().with_auth_token("secret-token");
        let debug = format!("{ctx:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_serde_roundtrip_skips_unset_fields() {
        let ctx = Context::new().with_auth_token("t");
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json, serde_json::json!({ "auth_token": "t" }));

        let back: Context = serde_json::from_value(json).unwrap();
        assert_eq!(back, ctx);
    }
}
