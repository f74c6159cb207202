//! Evidence gathered for a claim, and the sources backing it

use crate::Claim;
use serde::{Deserialize, Serialize};

/// A reference backing a piece of evidence or a verdict
///
/// Ordering within a list of sources is meaningful (most relevant first);
/// uniqueness is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// URL or other identifier of the source
    pub url: String,

    /// Human readable title
    #[serde(default)]
    pub title: String,

    /// Relevant excerpt from the source
    #[serde(default)]
    pub excerpt: String,
}

impl Source {
    /// Create a new source reference
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        excerpt: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            excerpt: excerpt.into(),
        }
    }
}

/// Evidence bundle for one claim that survived filtering
///
/// Produced by the evidence stage and consumed only by the verdict stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// The claim this evidence was gathered for
    pub claim: Claim,

    /// What the evidence says about the claim
    pub summary: String,

    /// Sources supporting the summary, most relevant first
    pub sources: Vec<Source>,
}

impl Evidence {
    /// Create a new evidence bundle
    pub fn new(claim: Claim, summary: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            claim,
            summary: summary.into(),
            sources,
        }
    }
}
