//! LLM-backed evidence gathering

use crate::config::AgentConfig;
use crate::parser::parse_evidence;
use crate::prompt::{EvidencePrompt, EVIDENCE_SCHEMA};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};
use verifact_domain::traits::{EvidenceGatherer, LlmProvider};
use verifact_domain::{Claim, Evidence, StageError};

/// Gathers evidence claim by claim by prompting an LLM
///
/// A claim whose lookup fails or yields nothing usable is skipped, so the
/// result may hold fewer bundles than claims. The stage only fails when
/// every lookup failed at the provider level.
pub struct LlmEvidenceHunter<L> {
    llm: Arc<L>,
    config: AgentConfig,
}

impl<L: LlmProvider> LlmEvidenceHunter<L> {
    /// Create a new evidence hunter
    pub fn new(llm: Arc<L>, config: AgentConfig) -> Self {
        Self { llm, config }
    }

    async fn lookup(&self, claim: &Claim) -> Result<String, String> {
        let prompt = EvidencePrompt::new(claim, self.config.max_sources_per_claim).build();
        let response = if self.config.structured_output {
            self.llm.generate_structured(&prompt, EVIDENCE_SCHEMA).await
        } else {
            self.llm.generate(&prompt).await
        };
        response.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl<L: LlmProvider + 'static> EvidenceGatherer for LlmEvidenceHunter<L> {
    async fn gather_evidence(&self, claims: &[Claim]) -> Result<Vec<Evidence>, StageError> {
        let mut gathered = Vec::with_capacity(claims.len());
        let mut provider_failures = 0;
        let mut last_error = None;

        for (idx, claim) in claims.iter().enumerate() {
            debug!("Gathering evidence for claim {}/{}", idx + 1, claims.len());

            let response = match self.lookup(claim).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Evidence lookup failed for claim {}: {}", idx, e);
                    provider_failures += 1;
                    last_error = Some(e);
                    continue;
                }
            };

            match parse_evidence(&response, claim) {
                Ok(Some(mut evidence)) => {
                    evidence.sources.truncate(self.config.max_sources_per_claim);
                    gathered.push(evidence);
                }
                Ok(None) => debug!("No evidence found for claim {}", idx),
                Err(e) => warn!("Unusable evidence for claim {}: {}", idx, e),
            }
        }

        if !claims.is_empty() && provider_failures == claims.len() {
            return Err(StageError::Unavailable(
                last_error.unwrap_or_else(|| "all evidence lookups failed".to_string()),
            ));
        }

        info!(
            "Gathered evidence for {} of {} claims",
            gathered.len(),
            claims.len()
        );
        Ok(gathered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifact_llm::MockProvider;

    fn evidence_json(summary: &str) -> String {
        format!(
            r#"{{"summary": "{}", "sources": [{{"url": "https://example.org", "title": "Example", "excerpt": ""}}]}}"#,
            summary
        )
    }

    #[tokio::test]
    async fn test_gathers_in_claim_order() {
        let mut llm = MockProvider::default();
        llm.add_response("Claim: first", evidence_json("about first"));
        llm.add_response("Claim: second", evidence_json("about second"));
        let hunter = LlmEvidenceHunter::new(Arc::new(llm), AgentConfig::default());

        let claims = vec![
            Claim::new("first", 0.9, "science"),
            Claim::new("second", 0.8, "science"),
        ];
        let evidence = hunter.gather_evidence(&claims).await.unwrap();

        assert_eq!(evidence.len(), 2);
        assert_eq!(evidence[0].claim.text, "first");
        assert_eq!(evidence[1].summary, "about second");
    }

    #[tokio::test]
    async fn test_partial_success_skips_failed_claims() {
        let mut llm = MockProvider::default();
        llm.add_error("Claim: broken");
        llm.add_response("Claim: fine", evidence_json("ok"));
        let hunter = LlmEvidenceHunter::new(Arc::new(llm), AgentConfig::default());

        let claims = vec![
            Claim::new("broken", 0.9, "science"),
            Claim::new("fine", 0.8, "science"),
        ];
        let evidence = hunter.gather_evidence(&claims).await.unwrap();

        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].claim.text, "fine");
    }

    #[tokio::test]
    async fn test_unparseable_answers_yield_empty_not_error() {
        let llm = MockProvider::new("no idea");
        let hunter = LlmEvidenceHunter::new(Arc::new(llm), AgentConfig::default());

        let claims = vec![Claim::new("anything", 0.9, "science")];
        let evidence = hunter.gather_evidence(&claims).await.unwrap();
        assert!(evidence.is_empty());
    }

    #[tokio::test]
    async fn test_all_lookups_failing_is_unavailable() {
        let mut llm = MockProvider::default();
        llm.add_error("Claim:");
        let hunter = LlmEvidenceHunter::new(Arc::new(llm), AgentConfig::default());

        let claims = vec![
            Claim::new("a", 0.9, "science"),
            Claim::new("b", 0.9, "science"),
        ];
        let result = hunter.gather_evidence(&claims).await;
        assert!(matches!(result, Err(StageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_no_claims_makes_no_calls() {
        let llm = Arc::new(MockProvider::default());
        let hunter = LlmEvidenceHunter::new(llm.clone(), AgentConfig::default());

        let evidence = hunter.gather_evidence(&[]).await.unwrap();
        assert!(evidence.is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_sources_capped_per_claim() {
        let sources: Vec<String> = (0..8)
            .map(|i| format!(r#"{{"url": "https://example.org/{}"}}"#, i))
            .collect();
        let response = format!(r#"{{"summary": "s", "sources": [{}]}}"#, sources.join(","));
        let config = AgentConfig {
            max_sources_per_claim: 3,
            ..AgentConfig::default()
        };
        let hunter = LlmEvidenceHunter::new(Arc::new(MockProvider::new(response)), config);

        let evidence = hunter
            .gather_evidence(&[Claim::new("c", 0.9, "science")])
            .await
            .unwrap();
        assert_eq!(evidence[0].sources.len(), 3);
        assert_eq!(evidence[0].sources[0].url, "https://example.org/0");
    }
}
