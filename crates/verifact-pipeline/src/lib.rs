//! VeriFact Pipeline
//!
//! Admission control and orchestration for fact-check requests.
//!
//! # Overview
//!
//! A request flows strictly forward:
//!
//! 1. **RateLimiter**: per-client sliding-window admission
//! 2. **ClaimDetector**: check-worthy claims in the text
//! 3. **Claim filter**: threshold, domain and cap selection
//! 4. **EvidenceGatherer**: evidence for the surviving claims
//! 5. **VerdictWriter**: one holistic verdict over the whole text
//!
//! Stages are trait objects from `verifact-domain`; any stage failure or
//! timeout ends the request with [`FactCheckError::Upstream`].
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use verifact_domain::{Claim, Verdict, VerdictLabel};
//! use verifact_pipeline::mock::{MockDetector, MockEvidenceGatherer, MockVerdictWriter};
//! use verifact_pipeline::{
//!     FactCheckOrchestrator, FactCheckRequest, PipelineConfig, PipelineStages, RateLimiter,
//! };
//!
//! # tokio_test::block_on(async {
//! let stages = PipelineStages::new(
//!     Arc::new(MockDetector::returning(vec![Claim::new("GDP grew", 0.9, "economics")])),
//!     Arc::new(MockEvidenceGatherer::new()),
//!     Arc::new(MockVerdictWriter::returning(Verdict::new(
//!         VerdictLabel::True, 0.8, "Confirmed", vec![],
//!     ))),
//! );
//! let limiter = Arc::new(RateLimiter::new(10, Duration::from_secs(60)).unwrap());
//! let orchestrator = FactCheckOrchestrator::new(stages, limiter, PipelineConfig::default());
//!
//! let response = orchestrator
//!     .fact_check("127.0.0.1", FactCheckRequest::new("GDP grew last year"))
//!     .await
//!     .unwrap();
//! assert_eq!(response.claims[0].verdict, VerdictLabel::True);
//! # });
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod filter;
pub mod mock;
mod orchestrator;
mod rate_limiter;
mod sweeper;
mod types;

pub use config::{PipelineConfig, DEFAULT_MODEL_VERSION};
pub use error::{FactCheckError, RateLimitError, Stage};
pub use filter::filter_claims;
pub use orchestrator::{FactCheckOrchestrator, PipelineStages};
pub use rate_limiter::{Admission, RateLimiter};
pub use sweeper::RateLimitSweeper;
pub use types::{
    ClaimVerdict, FactCheckRequest, FactCheckResponse, RequestOptions, ResponseMetadata,
};
