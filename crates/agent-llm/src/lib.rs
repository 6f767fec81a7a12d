//! LLM provider abstraction layer for agent-rs
//!
//! This crate provides provider-agnostic abstractions for chat completion:
//!
//! - Role-tagged message types
//! - Completion request/response types
//! - Tool descriptors listed in the agent prompt
//! - Provider trait for LLM implementations
//! - Concrete provider implementations (behind feature flags)
//! - Provider selection from environment configuration

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod settings;
pub mod tools;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
pub use settings::{LlmSettings, ProviderKind};
pub use tools::ToolDefinition;

// Provider implementations (feature-gated)
#[cfg(any(feature = "anthropic", feature = "openai"))]
pub mod providers;
