//! Mock pipeline stages for testing
//!
//! Each mock records the inputs it was called with, can be told to fail
//! with a given [`StageError`], and can be slowed down to exercise stage
//! timeouts. Clones share their records, so a test can keep one handle and
//! hand another to the orchestrator.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use verifact_domain::traits::{ClaimDetector, EvidenceGatherer, VerdictWriter};
use verifact_domain::{
    Claim, Evidence, ExplanationDetail, Source, StageError, Verdict, VerdictLabel,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn pause(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

/// Detector returning a fixed list of claims
#[derive(Debug, Clone, Default)]
pub struct MockDetector {
    claims: Vec<Claim>,
    error: Option<StageError>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockDetector {
    /// Detector that always returns `claims`
    pub fn returning(claims: Vec<Claim>) -> Self {
        Self {
            claims,
            ..Self::default()
        }
    }

    /// Detector that always fails with `error`
    pub fn failing(error: StageError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Sleep for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls so far
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Texts received so far, oldest first
    pub fn received(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl ClaimDetector for MockDetector {
    async fn detect_claims(&self, text: &str) -> Result<Vec<Claim>, StageError> {
        lock(&self.calls).push(text.to_string());
        pause(self.delay).await;

        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(self.claims.clone()),
        }
    }
}

/// Evidence gatherer producing one bundle per claim
///
/// Claims whose text is registered with [`MockEvidenceGatherer::skip`] get
/// no bundle, which simulates partial success.
#[derive(Debug, Clone, Default)]
pub struct MockEvidenceGatherer {
    skipped: Vec<String>,
    error: Option<StageError>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<Vec<Claim>>>>,
}

impl MockEvidenceGatherer {
    /// Gatherer returning one bundle per claim
    pub fn new() -> Self {
        Self::default()
    }

    /// Gatherer that always fails with `error`
    pub fn failing(error: StageError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Produce no bundle for the claim with this text
    pub fn skip(mut self, claim_text: impl Into<String>) -> Self {
        self.skipped.push(claim_text.into());
        self
    }

    /// Sleep for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls so far
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Claim lists received so far, oldest first
    pub fn received(&self) -> Vec<Vec<Claim>> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl EvidenceGatherer for MockEvidenceGatherer {
    async fn gather_evidence(&self, claims: &[Claim]) -> Result<Vec<Evidence>, StageError> {
        lock(&self.calls).push(claims.to_vec());
        pause(self.delay).await;

        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        Ok(claims
            .iter()
            .filter(|claim| !self.skipped.contains(&claim.text))
            .map(|claim| {
                Evidence::new(
                    claim.clone(),
                    format!("Evidence for: {}", claim.text),
                    vec![Source::new(
                        format!("https://example.org/{}", claim.domain),
                        format!("{} reference", claim.domain),
                        claim.text.clone(),
                    )],
                )
            })
            .collect())
    }
}

/// Input captured by [`MockVerdictWriter`]
#[derive(Debug, Clone, PartialEq)]
pub struct VerdictCall {
    /// Original text
    pub text: String,
    /// Evidence handed to the writer
    pub evidence: Vec<Evidence>,
    /// Requested explanation detail
    pub detail: ExplanationDetail,
}

/// Verdict writer returning a fixed verdict
#[derive(Debug, Clone)]
pub struct MockVerdictWriter {
    verdict: Verdict,
    error: Option<StageError>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<VerdictCall>>>,
}

impl Default for MockVerdictWriter {
    fn default() -> Self {
        Self::returning(Verdict::new(
            VerdictLabel::Unverified,
            0.5,
            "Mock verdict",
            Vec::new(),
        ))
    }
}

impl MockVerdictWriter {
    /// Writer that always returns `verdict`
    pub fn returning(verdict: Verdict) -> Self {
        Self {
            verdict,
            error: None,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Writer that always fails with `error`
    pub fn failing(error: StageError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Sleep for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls so far
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Calls received so far, oldest first
    pub fn received(&self) -> Vec<VerdictCall> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl VerdictWriter for MockVerdictWriter {
    async fn write_verdict(
        &self,
        text: &str,
        evidence: &[Evidence],
        detail: ExplanationDetail,
    ) -> Result<Verdict, StageError> {
        lock(&self.calls).push(VerdictCall {
            text: text.to_string(),
            evidence: evidence.to_vec(),
            detail,
        });
        pause(self.delay).await;

        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(self.verdict.clone()),
        }
    }
}
