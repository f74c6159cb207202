//! Error types for the fact-check pipeline

use std::fmt;
use std::time::Duration;
use thiserror::Error;
use verifact_domain::StageError;

/// Pipeline stage that talks to an external service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Claim detection
    Detect,
    /// Evidence gathering
    Gather,
    /// Verdict synthesis
    Synthesize,
}

impl Stage {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Detect => "detect",
            Stage::Gather => "gather",
            Stage::Synthesize => "synthesize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal errors of a fact-check request
///
/// All errors are request-local; none of them touch rate-limit accounting
/// or pipeline state of other requests.
#[derive(Error, Debug)]
pub enum FactCheckError {
    /// The client exceeded its quota
    #[error("Rate limit exceeded, retry after {}s", retry_after.as_secs())]
    RateLimited {
        /// Time until the client's oldest request leaves the window
        retry_after: Duration,
    },

    /// Missing, empty or oversized input text, or unusable options
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An external stage call failed or timed out
    #[error("{stage} stage failed: {source}")]
    Upstream {
        /// Stage that failed
        stage: Stage,
        /// What the stage reported
        source: StageError,
    },
}

impl FactCheckError {
    /// Whether the failure was a stage deadline elapsing
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            FactCheckError::Upstream {
                source: StageError::Timeout,
                ..
            }
        )
    }
}

/// Rate limiter configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    /// Limit of zero requests
    #[error("Rate limit must be greater than 0")]
    ZeroLimit,

    /// Window of zero length
    #[error("Rate limit window must be greater than 0")]
    ZeroWindow,
}
