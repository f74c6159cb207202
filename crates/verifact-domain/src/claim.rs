//! Claim module - a check-worthy statement found in the input text

use serde::{Deserialize, Serialize};

/// A claim detected in the text under review
///
/// Claims are immutable once created. They live for the duration of one
/// fact-check request and are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// The statement as it should be checked
    pub text: String,

    /// How worth checking the statement is, in [0.0, 1.0]
    pub check_worthiness: f64,

    /// Topical domain (e.g. "politics", "demographics")
    pub domain: String,
}

impl Claim {
    /// Create a new claim
    ///
    /// # Examples
    ///
    /// ```
    /// use verifact_domain::Claim;
    ///
    /// let claim = Claim::new("The Earth orbits the Sun", 0.9, "science");
    /// assert_eq!(claim.domain, "science");
    /// ```
    pub fn new(text: impl Into<String>, check_worthiness: f64, domain: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            check_worthiness,
            domain: domain.into(),
        }
    }

    /// Check that the claim is well formed
    ///
    /// Text and domain must be non-empty and the check-worthiness score
    /// must lie within [0.0, 1.0].
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("text is empty".to_string());
        }
        if self.domain.trim().is_empty() {
            return Err("domain is empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.check_worthiness) {
            return Err(format!(
                "check_worthiness {} out of range [0.0, 1.0]",
                self.check_worthiness
            ));
        }
        Ok(())
    }
}
