//! Per-request fact-check options

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How much detail the verdict explanation should carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationDetail {
    /// A sentence or two
    #[default]
    Brief,
    /// A full walk through the evidence
    Detailed,
}

/// Options controlling claim selection and verdict style
///
/// Fully resolved: every field has a value. Requests carry a partial form
/// that is resolved against configured defaults before the pipeline runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckOptions {
    /// Minimum check-worthiness for a claim to be checked
    pub min_check_worthiness: f64,

    /// Topical domains a claim must belong to
    pub domains: BTreeSet<String>,

    /// Maximum number of claims forwarded to evidence gathering
    pub max_claims: usize,

    /// Explanation detail for the verdict
    pub explanation_detail: ExplanationDetail,
}

/// Default minimum check-worthiness
pub const DEFAULT_MIN_CHECK_WORTHINESS: f64 = 0.3;

/// Default claim cap
pub const DEFAULT_MAX_CLAIMS: usize = 5;

/// Default topical domains
pub const DEFAULT_DOMAINS: &[&str] = &[
    "politics",
    "health",
    "science",
    "economics",
    "demographics",
    "environment",
    "technology",
    "general",
];

impl Default for FactCheckOptions {
    fn default() -> Self {
        Self {
            min_check_worthiness: DEFAULT_MIN_CHECK_WORTHINESS,
            domains: DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect(),
            max_claims: DEFAULT_MAX_CLAIMS,
            explanation_detail: ExplanationDetail::default(),
        }
    }
}

impl FactCheckOptions {
    /// Check that the options are usable
    pub fn validate(&self) -> Result<(), String> {
        if self.min_check_worthiness.is_nan() {
            return Err("min_check_worthiness must be a number".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = FactCheckOptions::default();
        assert_eq!(options.min_check_worthiness, 0.3);
        assert_eq!(options.max_claims, 5);
        assert!(options.domains.contains("demographics"));
        assert_eq!(options.explanation_detail, ExplanationDetail::Brief);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_nan_threshold_invalid() {
        let options = FactCheckOptions {
            min_check_worthiness: f64::NAN,
            ..FactCheckOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_explanation_detail_wire_format() {
        let detail: ExplanationDetail = serde_json::from_str("\"detailed\"").unwrap();
        assert_eq!(detail, ExplanationDetail::Detailed);
    }
}
