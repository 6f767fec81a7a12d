//! ReAct protocol pieces: reasoning steps, prompt formatting, output parsing
//! and per-session state.

pub mod formatter;
pub mod parser;
pub mod session;
pub mod step;

pub use formatter::ReActChatFormatter;
pub use parser::{ParseError, ReActOutputParser};
pub use session::Session;
pub use step::{ReasoningStep, redact_input, redact_text};
