//! Shared utilities for agent-rs
//!
//! This crate provides common functionality used across the agent-rs workspace:
//! tracing setup and the application-level configuration read at startup.

pub mod config;
pub mod logging;

pub use config::{Config, Environment};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
