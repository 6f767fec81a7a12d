//! Agent runtime for executing ReAct agents
//!
//! This crate provides the ReAct protocol pieces (reasoning steps, chat
//! formatter, output parser, sessions), the AgentExecutor loop, the
//! AgentRuntime holding shared resources, and a ReActAgent implementing the
//! core Agent trait.

pub mod agents;
pub mod executor;
pub mod react;
pub mod runtime;

// Re-export key types
pub use agents::ReActAgent;
pub use executor::{
    AgentExecutor, AgentExecutorBuilder, CANNOT_ANSWER, ChatResponse, ExecutorConfig,
    ExecutorEventHandler, NoOpEventHandler, Termination, ToolFailurePolicy,
};
pub use react::{ParseError, ReActChatFormatter, ReActOutputParser, ReasoningStep, Session};
pub use runtime::{AgentRuntime, AgentRuntimeBuilder};
