//! Prompt template management for agent-rs
//!
//! This crate provides Jinja2 prompt templates that know which placeholders
//! they reference, so a missing variable is caught before the first render.
//!
//! # Quick Start
//!
//! ```
//! use agent_prompt::{JinjaTemplate, PromptTemplate};
//! use serde_json::json;
//!
//! let template = JinjaTemplate::new(
//!     "system",
//!     "You can use: {{ tool_names }}",
//! ).unwrap();
//!
//! template.check_variables(&["tool_names", "tool_desc"]).unwrap();
//! assert!(template.check_variables(&["tool_desc"]).is_err());
//!
//! let prompt = template.render(&json!({ "tool_names": "a, b" })).unwrap();
//! assert_eq!(prompt, "You can use: a, b");
//! ```

mod error;
mod jinja;
mod template;

// Re-export core types
pub use error::{PromptError, Result};
pub use jinja::JinjaTemplate;
pub use template::PromptTemplate;
