//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the fact-check pipeline and
//! the services it calls. Every call is asynchronous, may be slow and may
//! fail. Implementations never retry at this level.

use crate::{Claim, Evidence, ExplanationDetail, Verdict};
use async_trait::async_trait;
use thiserror::Error;

/// Errors a pipeline stage can report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    /// The backing service could not be reached or answered with an error
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The backing service answered, but the answer could not be used
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The call did not finish in time
    #[error("Stage timed out")]
    Timeout,
}

/// Detects check-worthy claims in raw text
///
/// Implemented by the agents layer (verifact-agents)
#[async_trait]
pub trait ClaimDetector: Send + Sync {
    /// Detect claims, in the detector's priority order
    async fn detect_claims(&self, text: &str) -> Result<Vec<Claim>, StageError>;
}

/// Gathers evidence for filtered claims
///
/// Implemented by the agents layer (verifact-agents)
#[async_trait]
pub trait EvidenceGatherer: Send + Sync {
    /// Gather evidence for the given claims
    ///
    /// The result holds at most one bundle per claim, in input order.
    /// Returning fewer bundles than claims (partial success) is allowed.
    async fn gather_evidence(&self, claims: &[Claim]) -> Result<Vec<Evidence>, StageError>;
}

/// Writes the single verdict for a request
///
/// Implemented by the agents layer (verifact-agents)
#[async_trait]
pub trait VerdictWriter: Send + Sync {
    /// Synthesize a verdict over the original text from all gathered evidence
    ///
    /// `evidence` may be empty; implementations must still answer.
    async fn write_verdict(
        &self,
        text: &str,
        evidence: &[Evidence],
        detail: ExplanationDetail,
    ) -> Result<Verdict, StageError>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (verifact-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::fmt::Display + Send;

    /// Name of the model answering prompts
    fn model_name(&self) -> &str;

    /// Generate text completion
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with structured output (if supported)
    async fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}
