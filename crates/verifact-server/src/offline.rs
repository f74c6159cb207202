//! Fixed stages for running without a language model.
//!
//! Detection finds nothing and the verdict is always `unverified`, whatever
//! the input says, so every request takes the degraded path.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use verifact_domain::traits::{ClaimDetector, EvidenceGatherer, VerdictWriter};
use verifact_domain::{Claim, Evidence, ExplanationDetail, StageError, Verdict};
use verifact_pipeline::PipelineStages;

/// Explanation attached to every offline verdict
pub const OFFLINE_EXPLANATION: &str = "Running in offline mode; no model was consulted.";

/// Detector that never finds a claim
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineDetector;

#[async_trait]
impl ClaimDetector for OfflineDetector {
    async fn detect_claims(&self, text: &str) -> Result<Vec<Claim>, StageError> {
        debug!("Offline detection over {} bytes", text.len());
        Ok(Vec::new())
    }
}

/// Gatherer that has no evidence to offer
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineEvidenceGatherer;

#[async_trait]
impl EvidenceGatherer for OfflineEvidenceGatherer {
    async fn gather_evidence(&self, _claims: &[Claim]) -> Result<Vec<Evidence>, StageError> {
        Ok(Vec::new())
    }
}

/// Writer that answers `unverified` with zero confidence
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineVerdictWriter;

#[async_trait]
impl VerdictWriter for OfflineVerdictWriter {
    async fn write_verdict(
        &self,
        _text: &str,
        _evidence: &[Evidence],
        _detail: ExplanationDetail,
    ) -> Result<Verdict, StageError> {
        Ok(Verdict::unverified(OFFLINE_EXPLANATION))
    }
}

/// The three offline stages
pub fn offline_stages() -> PipelineStages {
    PipelineStages::new(
        Arc::new(OfflineDetector),
        Arc::new(OfflineEvidenceGatherer),
        Arc::new(OfflineVerdictWriter),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifact_domain::VerdictLabel;

    #[tokio::test]
    async fn test_prompt_like_text_detects_nothing() {
        let claims = OfflineDetector
            .detect_claims("Statement under review: taxes rose. Text to analyze: GDP grew.")
            .await
            .unwrap();
        assert!(claims.is_empty());
    }

    #[tokio::test]
    async fn test_verdict_is_unverified() {
        let verdict = OfflineVerdictWriter
            .write_verdict("Statement under review: taxes rose", &[], ExplanationDetail::Brief)
            .await
            .unwrap();
        assert_eq!(verdict.label, VerdictLabel::Unverified);
        assert_eq!(verdict.confidence, 0.0);
        assert_eq!(verdict.explanation, OFFLINE_EXPLANATION);
        assert!(verdict.sources.is_empty());
    }
}
