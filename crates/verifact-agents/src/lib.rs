//! VeriFact Agents
//!
//! Language-model-backed implementations of the three fact-check stages.
//!
//! # Architecture
//!
//! ```text
//! Text → LlmClaimDetector → [Claim] → (filter) → LlmEvidenceHunter → [Evidence] → LlmVerdictWriter → Verdict
//! ```
//!
//! Each stage owns a shared `LlmProvider` handle and is stateless per request,
//! so one instance of each is built at startup and reused.
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use verifact_agents::{AgentConfig, LlmClaimDetector};
//! use verifact_domain::traits::ClaimDetector;
//! use verifact_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = Arc::new(MockProvider::new("[]"));
//! let detector = LlmClaimDetector::new(llm, AgentConfig::default());
//!
//! let claims = detector.detect_claims("Canada's population has been increasing").await?;
//! println!("Detected {} claims", claims.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod detector;
mod error;
mod hunter;
mod parser;
mod prompt;
mod writer;

#[cfg(test)]
mod tests;

pub use config::AgentConfig;
pub use detector::LlmClaimDetector;
pub use error::AgentError;
pub use hunter::LlmEvidenceHunter;
pub use parser::{parse_claims, parse_evidence, parse_verdict};
pub use writer::LlmVerdictWriter;
