//! LLM-backed verdict synthesis

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::parser::parse_verdict;
use crate::prompt::{VerdictPrompt, VERDICT_SCHEMA};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use verifact_domain::traits::{LlmProvider, VerdictWriter};
use verifact_domain::{Evidence, ExplanationDetail, StageError, Verdict};

/// Writes the single verdict for a request by prompting an LLM
pub struct LlmVerdictWriter<L> {
    llm: Arc<L>,
    config: AgentConfig,
}

impl<L: LlmProvider> LlmVerdictWriter<L> {
    /// Create a new verdict writer
    pub fn new(llm: Arc<L>, config: AgentConfig) -> Self {
        Self { llm, config }
    }

    async fn write(
        &self,
        text: &str,
        evidence: &[Evidence],
        detail: ExplanationDetail,
    ) -> Result<Verdict, AgentError> {
        let prompt = VerdictPrompt::new(text, evidence, detail).build();
        debug!(
            "Verdict prompt length: {} chars, {} evidence bundles",
            prompt.len(),
            evidence.len()
        );

        let response = if self.config.structured_output {
            self.llm.generate_structured(&prompt, VERDICT_SCHEMA).await
        } else {
            self.llm.generate(&prompt).await
        }
        .map_err(|e| AgentError::Llm(e.to_string()))?;

        let mut verdict = parse_verdict(&response)?;

        // Fall back to the evidence sources when the model cites none
        if verdict.sources.is_empty() {
            verdict.sources = evidence
                .iter()
                .flat_map(|item| item.sources.iter().cloned())
                .collect();
        }
        verdict.sources.truncate(self.config.max_verdict_sources);

        Ok(verdict)
    }
}

#[async_trait]
impl<L: LlmProvider + 'static> VerdictWriter for LlmVerdictWriter<L> {
    async fn write_verdict(
        &self,
        text: &str,
        evidence: &[Evidence],
        detail: ExplanationDetail,
    ) -> Result<Verdict, StageError> {
        Ok(self.write(text, evidence, detail).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifact_domain::{Claim, Source, VerdictLabel};
    use verifact_llm::MockProvider;

    #[tokio::test]
    async fn test_writes_verdict() {
        let llm = Arc::new(MockProvider::new(
            r#"{"verdict": "true", "confidence": 0.95, "explanation": "Census confirms it."}"#,
        ));
        let writer = LlmVerdictWriter::new(llm.clone(), AgentConfig::default());

        let evidence = vec![Evidence::new(
            Claim::new("Population grew", 0.9, "demographics"),
            "Growth every year since 1990",
            vec![Source::new("https://statcan.gc.ca", "StatCan", "")],
        )];
        let verdict = writer
            .write_verdict("Canada's population has been increasing", &evidence, ExplanationDetail::Brief)
            .await
            .unwrap();

        assert_eq!(verdict.label, VerdictLabel::True);
        assert_eq!(verdict.confidence, 0.95);
        // No cited sources in the answer, so evidence sources are used
        assert_eq!(verdict.sources.len(), 1);
        assert_eq!(verdict.sources[0].url, "https://statcan.gc.ca");
    }

    #[tokio::test]
    async fn test_writes_verdict_without_evidence() {
        let llm = Arc::new(MockProvider::new(
            r#"{"verdict": "unverified", "confidence": 0.1, "explanation": "Nothing to go on."}"#,
        ));
        let writer = LlmVerdictWriter::new(llm.clone(), AgentConfig::default());

        let verdict = writer
            .write_verdict("Some statement", &[], ExplanationDetail::Detailed)
            .await
            .unwrap();

        assert_eq!(verdict.label, VerdictLabel::Unverified);
        assert!(verdict.sources.is_empty());
        assert!(llm.prompts()[0].contains("No evidence could be gathered"));
    }

    #[tokio::test]
    async fn test_llm_failure_is_unavailable() {
        let mut llm = MockProvider::default();
        llm.add_error("Statement under review");
        let writer = LlmVerdictWriter::new(Arc::new(llm), AgentConfig::default());

        let result = writer
            .write_verdict("x", &[], ExplanationDetail::Brief)
            .await;
        assert!(matches!(result, Err(StageError::Unavailable(_))));
    }
}
