//! Error types for the language-model stages

use thiserror::Error;
use verifact_domain::StageError;

/// Errors that can occur inside an LLM-backed stage
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// The LLM answered with something other than the requested shape
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The LLM answer was not valid JSON
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl From<serde_json::Error> for AgentError {
    fn from(e: serde_json::Error) -> Self {
        AgentError::JsonParse(e.to_string())
    }
}

impl From<AgentError> for StageError {
    fn from(e: AgentError) -> Self {
        match e {
            AgentError::Llm(msg) => StageError::Unavailable(msg),
            other => StageError::InvalidResponse(other.to_string()),
        }
    }
}
