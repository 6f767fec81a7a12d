//! Prompt templates for the trading assistant

mod system;

pub use system::*;
