//! Error types for prompt operations

use thiserror::Error;

/// Result type for prompt operations
pub type Result<T> = std::result::Result<T, PromptError>;

/// Errors that can occur during prompt operations
#[derive(Error, Debug)]
pub enum PromptError {
    /// Template parsing failed
    #[error("Failed to parse template '{name}': {detail}")]
    TemplateParseFailed { name: String, detail: String },

    /// Template rendering failed
    #[error("Failed to render template '{name}': {detail}")]
    RenderError { name: String, detail: String },

    /// Placeholders referenced by the template that the caller does not supply
    #[error("Template '{name}' references variables that are not supplied: {}", missing.join(", "))]
    MissingVariables { name: String, missing: Vec<String> },

    /// Variable serialization error
    #[error("Failed to serialize variables: {0}")]
    SerializationError(String),
}

impl From<PromptError> for agent_core::Error {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::TemplateParseFailed { .. } | PromptError::MissingVariables { .. } => {
                agent_core::Error::Configuration(err.to_string())
            }
            PromptError::RenderError { .. } | PromptError::SerializationError(_) => {
                agent_core::Error::ProcessingFailed(err.to_string())
            }
        }
    }
}
