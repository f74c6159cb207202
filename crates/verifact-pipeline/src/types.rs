//! Request and response types for a fact-check

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;
use verifact_domain::{ExplanationDetail, FactCheckOptions, Source, VerdictLabel};

/// A fact-check request as received from a client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactCheckRequest {
    /// Text to fact-check
    #[serde(default)]
    pub text: Option<String>,

    /// Options; omitted fields fall back to configured defaults
    #[serde(default)]
    pub options: Option<RequestOptions>,
}

impl FactCheckRequest {
    /// Create a request for the given text with default options
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            options: None,
        }
    }

    /// Attach options
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Partially specified options as sent by a client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Minimum check-worthiness
    #[serde(default, alias = "minCheckWorthiness", skip_serializing_if = "Option::is_none")]
    pub min_check_worthiness: Option<f64>,

    /// Topical domains
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<BTreeSet<String>>,

    /// Claim cap
    #[serde(default, alias = "maxClaims", skip_serializing_if = "Option::is_none")]
    pub max_claims: Option<usize>,

    /// Explanation detail
    #[serde(default, alias = "explanationDetail", skip_serializing_if = "Option::is_none")]
    pub explanation_detail: Option<ExplanationDetail>,
}

impl RequestOptions {
    /// Fill every missing field from `defaults`
    pub fn resolve(self, defaults: &FactCheckOptions) -> FactCheckOptions {
        FactCheckOptions {
            min_check_worthiness: self
                .min_check_worthiness
                .unwrap_or(defaults.min_check_worthiness),
            domains: self.domains.unwrap_or_else(|| defaults.domains.clone()),
            max_claims: self.max_claims.unwrap_or(defaults.max_claims),
            explanation_detail: self
                .explanation_detail
                .unwrap_or(defaults.explanation_detail),
        }
    }
}

impl From<FactCheckOptions> for RequestOptions {
    fn from(options: FactCheckOptions) -> Self {
        Self {
            min_check_worthiness: Some(options.min_check_worthiness),
            domains: Some(options.domains),
            max_claims: Some(options.max_claims),
            explanation_detail: Some(options.explanation_detail),
        }
    }
}

/// The verdict entry of a response
///
/// `text` echoes the whole input: the verdict is over the full text, not
/// over any single detected claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimVerdict {
    /// The checked text
    pub text: String,
    /// Verdict label
    pub verdict: VerdictLabel,
    /// Confidence in [0.0, 1.0]
    pub confidence: f64,
    /// Explanation of the verdict
    pub explanation: String,
    /// Sources backing the verdict
    pub sources: Vec<Source>,
}

/// Response metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Wall time from admission to assembly, e.g. `"0.4s"`
    pub processing_time: String,
    /// Configured model version
    pub model_version: String,
    /// Input length in UTF-8 bytes, not characters (`"é"` counts 2)
    ///
    /// Same unit as [`PipelineConfig::max_text_length`](crate::PipelineConfig).
    pub input_length: usize,
    /// Fully resolved options the request ran with
    pub options_used: FactCheckOptions,
    /// Claims returned by detection
    pub claims_detected: usize,
    /// Claims that survived filtering
    pub claims_checked: usize,
    /// Evidence bundles gathered
    pub evidence_gathered: usize,
    /// Whether the verdict was written without any evidence
    pub degraded: bool,
}

/// A completed fact-check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckResponse {
    /// Request identifier
    pub id: Uuid,
    /// Exactly one entry holding the verdict over the input text
    pub claims: Vec<ClaimVerdict>,
    /// Processing metadata
    pub metadata: ResponseMetadata,
}

impl FactCheckResponse {
    /// The single verdict entry
    pub fn verdict(&self) -> Option<&ClaimVerdict> {
        self.claims.first()
    }
}
