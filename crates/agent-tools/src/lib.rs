//! Tool management and execution framework for agent-rs
//!
//! This crate provides a framework for defining tools (functions) that agents
//! can call, an immutable registry shared between sessions, and the output
//! record a tool call produces.

pub mod output;
pub mod registry;
pub mod tool;

pub use output::ToolOutput;
pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use tool::Tool;
