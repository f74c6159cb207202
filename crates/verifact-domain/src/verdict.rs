//! Verdict module - the holistic judgement over the input text

use crate::Source;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Verdict label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictLabel {
    /// Supported by the evidence
    True,
    /// Contradicted by the evidence
    False,
    /// Partly supported, partly contradicted
    PartiallyTrue,
    /// Technically accurate but framed to mislead
    Misleading,
    /// Not enough evidence to decide
    Unverified,
}

impl VerdictLabel {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictLabel::True => "true",
            VerdictLabel::False => "false",
            VerdictLabel::PartiallyTrue => "partially_true",
            VerdictLabel::Misleading => "misleading",
            VerdictLabel::Unverified => "unverified",
        }
    }
}

impl fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerdictLabel {
    type Err = String;

    /// Lenient parse: case-insensitive, accepts spaces or hyphens for
    /// `partially_true`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "true" => Ok(VerdictLabel::True),
            "false" => Ok(VerdictLabel::False),
            "partially_true" | "partly_true" => Ok(VerdictLabel::PartiallyTrue),
            "misleading" => Ok(VerdictLabel::Misleading),
            "unverified" | "unverifiable" => Ok(VerdictLabel::Unverified),
            other => Err(format!("Unknown verdict label: {}", other)),
        }
    }
}

/// A verdict over the whole input text
///
/// There is exactly one verdict per fact-check request, synthesized from
/// all gathered evidence rather than one per claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// The judgement
    #[serde(rename = "verdict")]
    pub label: VerdictLabel,

    /// Confidence in the judgement, in [0.0, 1.0]
    pub confidence: f64,

    /// Explanation of the judgement
    pub explanation: String,

    /// Sources backing the judgement, most relevant first
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl Verdict {
    /// Create a new verdict, clamping confidence into [0.0, 1.0]
    pub fn new(
        label: VerdictLabel,
        confidence: f64,
        explanation: impl Into<String>,
        sources: Vec<Source>,
    ) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            label,
            confidence,
            explanation: explanation.into(),
            sources,
        }
    }

    /// An unverified verdict carrying no sources
    pub fn unverified(explanation: impl Into<String>) -> Self {
        Self::new(VerdictLabel::Unverified, 0.0, explanation, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip_str() {
        for label in [
            VerdictLabel::True,
            VerdictLabel::False,
            VerdictLabel::PartiallyTrue,
            VerdictLabel::Misleading,
            VerdictLabel::Unverified,
        ] {
            assert_eq!(label.as_str().parse::<VerdictLabel>().unwrap(), label);
        }
    }

    #[test]
    fn test_label_lenient_parse() {
        assert_eq!("TRUE".parse::<VerdictLabel>().unwrap(), VerdictLabel::True);
        assert_eq!(
            "Partially True".parse::<VerdictLabel>().unwrap(),
            VerdictLabel::PartiallyTrue
        );
        assert!("maybe".parse::<VerdictLabel>().is_err());
    }

    #[test]
    fn test_label_serializes_snake_case() {
        let json = serde_json::to_string(&VerdictLabel::PartiallyTrue).unwrap();
        assert_eq!(json, "\"partially_true\"");
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(Verdict::new(VerdictLabel::True, 1.4, "", vec![]).confidence, 1.0);
        assert_eq!(Verdict::new(VerdictLabel::False, -3.0, "", vec![]).confidence, 0.0);
        assert_eq!(Verdict::new(VerdictLabel::False, f64::NAN, "", vec![]).confidence, 0.0);
    }

    #[test]
    fn test_verdict_field_named_verdict_on_wire() {
        let verdict = Verdict::new(VerdictLabel::True, 0.95, "ok", vec![]);
        let value = serde_json::to_value(&verdict).unwrap();
        assert_eq!(value["verdict"], "true");
    }
}
