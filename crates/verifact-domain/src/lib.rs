//! VeriFact Domain Layer
//!
//! Value types and capability contracts shared by every VeriFact crate.
//!
//! ## Key Concepts
//!
//! - **Claim**: A check-worthy statement detected in the input text
//! - **Evidence**: Material gathered for one surviving claim
//! - **Verdict**: The single holistic judgement over the whole input text
//! - **FactCheckOptions**: Per-request knobs for claim selection and explanation detail
//!
//! ## Architecture
//!
//! This crate holds no infrastructure. The three pipeline stages and the
//! language-model provider are trait definitions here; implementations live
//! in `verifact-llm` and `verifact-agents`, and tests substitute mocks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod evidence;
pub mod options;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use claim::Claim;
pub use evidence::{Evidence, Source};
pub use options::{ExplanationDetail, FactCheckOptions};
pub use traits::StageError;
pub use verdict::{Verdict, VerdictLabel};
