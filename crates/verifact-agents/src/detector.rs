//! LLM-backed claim detection

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::parser::parse_claims;
use crate::prompt::{DetectionPrompt, CLAIMS_SCHEMA};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use verifact_domain::traits::{ClaimDetector, LlmProvider};
use verifact_domain::{Claim, StageError};

/// Detects check-worthy claims by prompting an LLM
pub struct LlmClaimDetector<L> {
    llm: Arc<L>,
    config: AgentConfig,
    domain_hints: Vec<String>,
}

impl<L: LlmProvider> LlmClaimDetector<L> {
    /// Create a new detector
    pub fn new(llm: Arc<L>, config: AgentConfig) -> Self {
        Self {
            llm,
            config,
            domain_hints: Vec::new(),
        }
    }

    /// Suggest domain labels so detected domains line up with filter options
    pub fn with_domain_hints(mut self, domains: impl IntoIterator<Item = String>) -> Self {
        self.domain_hints = domains.into_iter().collect();
        self
    }

    async fn detect(&self, text: &str) -> Result<Vec<Claim>, AgentError> {
        let prompt = DetectionPrompt::new(text)
            .with_domains(&self.domain_hints)
            .build();

        debug!("Detection prompt length: {} chars", prompt.len());

        let response = if self.config.structured_output {
            self.llm.generate_structured(&prompt, CLAIMS_SCHEMA).await
        } else {
            self.llm.generate(&prompt).await
        }
        .map_err(|e| AgentError::Llm(e.to_string()))?;

        let claims = parse_claims(&response)?;
        debug!("Detected {} claims", claims.len());
        Ok(claims)
    }
}

#[async_trait]
impl<L: LlmProvider + 'static> ClaimDetector for LlmClaimDetector<L> {
    async fn detect_claims(&self, text: &str) -> Result<Vec<Claim>, StageError> {
        Ok(self.detect(text).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifact_llm::MockProvider;

    #[tokio::test]
    async fn test_detects_claims() {
        let llm = Arc::new(MockProvider::new(
            r#"{"claims": [{"text": "Water boils at 100C at sea level", "check_worthiness": 0.6, "domain": "science"}]}"#,
        ));
        let detector = LlmClaimDetector::new(llm.clone(), AgentConfig::default());

        let claims = detector.detect_claims("Water boils at 100C").await.unwrap();
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].domain, "science");
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_domain_hints_reach_prompt() {
        let llm = Arc::new(MockProvider::new("[]"));
        let detector = LlmClaimDetector::new(llm.clone(), AgentConfig::default())
            .with_domain_hints(vec!["demographics".to_string()]);

        detector.detect_claims("text").await.unwrap();
        assert!(llm.prompts()[0].contains("demographics"));
    }

    #[tokio::test]
    async fn test_llm_failure_is_unavailable() {
        let mut llm = MockProvider::default();
        llm.add_error("Text to analyze");
        let detector = LlmClaimDetector::new(Arc::new(llm), AgentConfig::default());

        let result = detector.detect_claims("anything").await;
        assert!(matches!(result, Err(StageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_garbage_is_invalid_response() {
        let llm = Arc::new(MockProvider::new("I could not find any claims."));
        let detector = LlmClaimDetector::new(llm, AgentConfig::default());

        let result = detector.detect_claims("anything").await;
        assert!(matches!(result, Err(StageError::InvalidResponse(_))));
    }
}
