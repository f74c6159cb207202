//! Stage-to-stage tests over a single mock provider

#[cfg(test)]
mod tests {
    use crate::{AgentConfig, LlmClaimDetector, LlmEvidenceHunter, LlmVerdictWriter};
    use std::sync::Arc;
    use verifact_domain::traits::{ClaimDetector, EvidenceGatherer, VerdictWriter};
    use verifact_domain::{ExplanationDetail, VerdictLabel};
    use verifact_llm::MockProvider;

    fn scripted_provider() -> MockProvider {
        let mut llm = MockProvider::default();
        // Most specific patterns first: the verdict prompt also quotes the claim
        llm.add_response(
            "Statement under review",
            r#"{"verdict": "true", "confidence": 0.9, "explanation": "Supported by census data.", "sources": []}"#,
        );
        llm.add_response(
            "Text to analyze",
            r#"{"claims": [
                {"text": "Canada's population has been increasing", "check_worthiness": 0.9, "domain": "demographics"}
            ]}"#,
        );
        llm.add_response(
            "Claim: Canada's population",
            r#"{"summary": "Population rose every year since 1990", "sources": [{"url": "https://statcan.gc.ca", "title": "Statistics Canada", "excerpt": ""}]}"#,
        );
        llm
    }

    #[tokio::test]
    async fn test_full_stage_flow() {
        let llm = Arc::new(scripted_provider());
        let config = AgentConfig::default();

        let detector = LlmClaimDetector::new(llm.clone(), config.clone());
        let hunter = LlmEvidenceHunter::new(llm.clone(), config.clone());
        let writer = LlmVerdictWriter::new(llm.clone(), config);

        let text = "Canada's population has been increasing";
        let claims = detector.detect_claims(text).await.unwrap();
        assert_eq!(claims.len(), 1);

        let evidence = hunter.gather_evidence(&claims).await.unwrap();
        assert_eq!(evidence.len(), 1);

        let verdict = writer
            .write_verdict(text, &evidence, ExplanationDetail::Brief)
            .await
            .unwrap();
        assert_eq!(verdict.label, VerdictLabel::True);
        assert_eq!(verdict.sources[0].title, "Statistics Canada");

        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn test_stages_usable_as_trait_objects() {
        let llm = Arc::new(scripted_provider());
        let detector: Arc<dyn ClaimDetector> =
            Arc::new(LlmClaimDetector::new(llm.clone(), AgentConfig::default()));

        let claims = detector
            .detect_claims("Canada's population has been increasing")
            .await
            .unwrap();
        assert_eq!(claims[0].domain, "demographics");
    }
}
