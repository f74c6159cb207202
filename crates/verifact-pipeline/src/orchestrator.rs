//! Fact-check orchestration
//!
//! Runs one request through admission, detection, filtering, evidence
//! gathering and verdict synthesis, strictly in that order.

use crate::config::PipelineConfig;
use crate::error::{FactCheckError, Stage};
use crate::filter::filter_claims;
use crate::rate_limiter::{Admission, RateLimiter};
use crate::types::{ClaimVerdict, FactCheckRequest, FactCheckResponse, ResponseMetadata};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;
use verifact_domain::traits::{ClaimDetector, EvidenceGatherer, VerdictWriter};
use verifact_domain::StageError;

/// The three stage implementations a pipeline runs
///
/// Stages are constructed once and shared by every request.
#[derive(Clone)]
pub struct PipelineStages {
    /// Claim detection
    pub detector: Arc<dyn ClaimDetector>,
    /// Evidence gathering
    pub gatherer: Arc<dyn EvidenceGatherer>,
    /// Verdict synthesis
    pub writer: Arc<dyn VerdictWriter>,
}

impl PipelineStages {
    /// Bundle three stage implementations
    pub fn new(
        detector: Arc<dyn ClaimDetector>,
        gatherer: Arc<dyn EvidenceGatherer>,
        writer: Arc<dyn VerdictWriter>,
    ) -> Self {
        Self {
            detector,
            gatherer,
            writer,
        }
    }
}

/// Sequences a fact-check request through the pipeline
///
/// The only state shared between requests is the rate limiter; everything
/// else is read-only configuration and stateless stages.
pub struct FactCheckOrchestrator {
    stages: PipelineStages,
    rate_limiter: Arc<RateLimiter>,
    config: PipelineConfig,
}

impl FactCheckOrchestrator {
    /// Create a new orchestrator
    pub fn new(stages: PipelineStages, rate_limiter: Arc<RateLimiter>, config: PipelineConfig) -> Self {
        Self {
            stages,
            rate_limiter,
            config,
        }
    }

    /// The rate limiter guarding this pipeline
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.rate_limiter
    }

    /// Pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fact-check one request on behalf of `client_id`
    ///
    /// # Errors
    ///
    /// - [`FactCheckError::RateLimited`] when the client is over quota; no
    ///   stage is called
    /// - [`FactCheckError::InvalidInput`] for missing, blank or oversized text
    /// - [`FactCheckError::Upstream`] when a stage fails or exceeds the stage
    ///   timeout; no partial response is produced
    pub async fn fact_check(
        &self,
        client_id: &str,
        request: FactCheckRequest,
    ) -> Result<FactCheckResponse, FactCheckError> {
        let id = Uuid::now_v7();
        let span = info_span!("fact_check", request_id = %id, client = %client_id);
        self.run(id, client_id, request).instrument(span).await
    }

    async fn run(
        &self,
        id: Uuid,
        client_id: &str,
        request: FactCheckRequest,
    ) -> Result<FactCheckResponse, FactCheckError> {
        let start = Instant::now();

        if let Admission::Rejected { retry_after } = self.rate_limiter.check(client_id, start) {
            info!("Rate limited, retry after {:?}", retry_after);
            return Err(FactCheckError::RateLimited { retry_after });
        }

        let text = match request.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                return Err(FactCheckError::InvalidInput(
                    "No text provided for fact-checking".to_string(),
                ))
            }
        };
        if text.len() > self.config.max_text_length {
            return Err(FactCheckError::InvalidInput(format!(
                "Text too long: {} bytes (max: {})",
                text.len(),
                self.config.max_text_length
            )));
        }

        let options = request
            .options
            .unwrap_or_default()
            .resolve(&self.config.defaults);
        options.validate().map_err(FactCheckError::InvalidInput)?;

        info!("Starting fact-check, text length {}", text.len());

        debug!("Detecting claims");
        let claims = self
            .bounded(Stage::Detect, self.stages.detector.detect_claims(&text))
            .await?;

        let selected = filter_claims(&claims, &options);
        info!(
            "Filtered claims: {} out of {} total claims",
            selected.len(),
            claims.len()
        );

        let evidence = if selected.is_empty() {
            warn!("No claims survived filtering, writing verdict without evidence");
            Vec::new()
        } else {
            debug!("Gathering evidence for {} claims", selected.len());
            self.bounded(Stage::Gather, self.stages.gatherer.gather_evidence(&selected))
                .await?
        };
        if !selected.is_empty() && evidence.len() < selected.len() {
            info!(
                "Partial evidence: {} of {} claims",
                evidence.len(),
                selected.len()
            );
        }

        debug!("Writing verdict over {} evidence bundles", evidence.len());
        let verdict = self
            .bounded(
                Stage::Synthesize,
                self.stages
                    .writer
                    .write_verdict(&text, &evidence, options.explanation_detail),
            )
            .await?;

        let elapsed = start.elapsed();
        info!(
            "Fact-check complete: verdict {} ({:.2}) in {:?}",
            verdict.label, verdict.confidence, elapsed
        );

        let metadata = ResponseMetadata {
            processing_time: format!("{:.1}s", elapsed.as_secs_f64()),
            model_version: self.config.model_version.clone(),
            input_length: text.len(),
            claims_detected: claims.len(),
            claims_checked: selected.len(),
            evidence_gathered: evidence.len(),
            degraded: evidence.is_empty(),
            options_used: options,
        };

        Ok(FactCheckResponse {
            id,
            claims: vec![ClaimVerdict {
                text,
                verdict: verdict.label,
                confidence: verdict.confidence,
                explanation: verdict.explanation,
                sources: verdict.sources,
            }],
            metadata,
        })
    }

    /// Await a stage call under the stage timeout
    ///
    /// An elapsed deadline drops the in-flight call.
    async fn bounded<T, F>(&self, stage: Stage, call: F) -> Result<T, FactCheckError>
    where
        F: Future<Output = Result<T, StageError>>,
    {
        match timeout(self.config.stage_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => {
                warn!("{} stage failed: {}", stage, source);
                Err(FactCheckError::Upstream { stage, source })
            }
            Err(_) => {
                warn!(
                    "{} stage timed out after {:?}",
                    stage, self.config.stage_timeout
                );
                Err(FactCheckError::Upstream {
                    stage,
                    source: StageError::Timeout,
                })
            }
        }
    }
}
