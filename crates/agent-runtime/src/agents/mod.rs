//! Concrete agent implementations
//!
//! - ReActAgent: answers one query with the ReAct loop behind the Agent trait

pub mod react;

pub use react::ReActAgent;
