//! LLM prompt engineering for the three fact-check stages

use verifact_domain::{Claim, Evidence, ExplanationDetail};

/// JSON schema hint for claim detection output
pub const CLAIMS_SCHEMA: &str =
    r#"{"claims":[{"text":"string","check_worthiness":"number","domain":"string"}]}"#;

/// JSON schema hint for evidence output
pub const EVIDENCE_SCHEMA: &str =
    r#"{"summary":"string","sources":[{"url":"string","title":"string","excerpt":"string"}]}"#;

/// JSON schema hint for verdict output
pub const VERDICT_SCHEMA: &str = r#"{"verdict":"string","confidence":"number","explanation":"string","sources":[{"url":"string","title":"string","excerpt":"string"}]}"#;

/// Builds the claim detection prompt
pub struct DetectionPrompt<'a> {
    text: &'a str,
    domains: &'a [String],
}

impl<'a> DetectionPrompt<'a> {
    /// Create a new detection prompt for `text`
    pub fn new(text: &'a str) -> Self {
        Self { text, domains: &[] }
    }

    /// Suggest domain labels the detector should prefer
    pub fn with_domains(mut self, domains: &'a [String]) -> Self {
        self.domains = domains;
        self
    }

    /// Build the complete detection prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(DETECTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        if !self.domains.is_empty() {
            prompt.push_str(&format!(
                "Preferred domain labels: {}\n\n",
                self.domains.join(", ")
            ));
        }

        prompt.push_str("Text to analyze:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\n");

        prompt.push_str(DETECTION_OUTPUT_FORMAT);
        prompt
    }
}

/// Builds the evidence gathering prompt for one claim
pub struct EvidencePrompt<'a> {
    claim: &'a Claim,
    max_sources: usize,
}

impl<'a> EvidencePrompt<'a> {
    /// Create a new evidence prompt for `claim`
    pub fn new(claim: &'a Claim, max_sources: usize) -> Self {
        Self { claim, max_sources }
    }

    /// Build the complete evidence prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EVIDENCE_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(&format!("Domain: {}\n", self.claim.domain));
        prompt.push_str(&format!("Claim: {}\n\n", self.claim.text));
        prompt.push_str(&format!(
            "Cite at most {} sources, most relevant first.\n\n",
            self.max_sources
        ));
        prompt.push_str(EVIDENCE_OUTPUT_FORMAT);
        prompt
    }
}

/// Builds the verdict prompt over the whole input text
pub struct VerdictPrompt<'a> {
    text: &'a str,
    evidence: &'a [Evidence],
    detail: ExplanationDetail,
}

impl<'a> VerdictPrompt<'a> {
    /// Create a new verdict prompt
    pub fn new(text: &'a str, evidence: &'a [Evidence], detail: ExplanationDetail) -> Self {
        Self {
            text,
            evidence,
            detail,
        }
    }

    /// Build the complete verdict prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(VERDICT_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Statement under review:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\n");

        if self.evidence.is_empty() {
            prompt.push_str(
                "No evidence could be gathered. Unless the statement can be judged \
                 without evidence, answer \"unverified\" with low confidence.\n\n",
            );
        } else {
            prompt.push_str("Evidence:\n");
            for (idx, item) in self.evidence.iter().enumerate() {
                prompt.push_str(&format!(
                    "{}. Claim: {}\n   Finding: {}\n",
                    idx + 1,
                    item.claim.text,
                    item.summary
                ));
                for source in &item.sources {
                    prompt.push_str(&format!("   Source: {} ({})\n", source.title, source.url));
                }
            }
            prompt.push('\n');
        }

        prompt.push_str(match self.detail {
            ExplanationDetail::Brief => "Explanation: one or two sentences.\n\n",
            ExplanationDetail::Detailed => {
                "Explanation: a detailed paragraph walking through each piece of evidence.\n\n"
            }
        });

        prompt.push_str(VERDICT_OUTPUT_FORMAT);
        prompt
    }
}

const DETECTION_INSTRUCTIONS: &str = r#"Identify the factual claims in the following text that are worth fact-checking.

Rules:
- One verifiable statement per claim; skip opinions, predictions and questions
- check_worthiness is 0.0-1.0: how much public harm or interest hangs on the claim being wrong
- domain is a single lowercase topical label (e.g. politics, health, science, economics, demographics)
- List claims from most to least check-worthy"#;

const DETECTION_OUTPUT_FORMAT: &str = r#"Output format (JSON only, no additional text):
{
  "claims": [
    {"text": "the claim", "check_worthiness": 0.0-1.0, "domain": "label"}
  ]
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

const EVIDENCE_INSTRUCTIONS: &str = r#"Find evidence that supports or refutes the following claim.
Prefer primary sources, official statistics and peer-reviewed work. Summarize what the evidence says about the claim without giving a final verdict."#;

const EVIDENCE_OUTPUT_FORMAT: &str = r#"Output format (JSON only, no additional text):
{
  "summary": "what the evidence says",
  "sources": [
    {"url": "https://...", "title": "source title", "excerpt": "relevant passage"}
  ]
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

const VERDICT_INSTRUCTIONS: &str = r#"Decide whether the statement below is accurate, using only the evidence provided.
Allowed verdicts: true, false, partially_true, misleading, unverified.
confidence is 0.0-1.0 and must be low when evidence is thin."#;

const VERDICT_OUTPUT_FORMAT: &str = r#"Output format (JSON only, no additional text):
{
  "verdict": "true|false|partially_true|misleading|unverified",
  "confidence": 0.0-1.0,
  "explanation": "why",
  "sources": [
    {"url": "https://...", "title": "source title", "excerpt": "relevant passage"}
  ]
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

#[cfg(test)]
mod tests {
    use super::*;
    use verifact_domain::Source;

    #[test]
    fn test_detection_prompt_includes_text() {
        let prompt = DetectionPrompt::new("Canada's population has been increasing").build();
        assert!(prompt.contains("Canada's population has been increasing"));
        assert!(prompt.contains("check_worthiness"));
    }

    #[test]
    fn test_detection_prompt_lists_domains() {
        let domains = vec!["health".to_string(), "science".to_string()];
        let prompt = DetectionPrompt::new("text").with_domains(&domains).build();
        assert!(prompt.contains("Preferred domain labels: health, science"));
    }

    #[test]
    fn test_evidence_prompt_includes_claim() {
        let claim = Claim::new("Vaccines cause autism", 0.95, "health");
        let prompt = EvidencePrompt::new(&claim, 3).build();
        assert!(prompt.contains("Claim: Vaccines cause autism"));
        assert!(prompt.contains("Domain: health"));
        assert!(prompt.contains("at most 3 sources"));
    }

    #[test]
    fn test_verdict_prompt_without_evidence() {
        let prompt = VerdictPrompt::new("Some statement", &[], ExplanationDetail::Brief).build();
        assert!(prompt.contains("No evidence could be gathered"));
        assert!(prompt.contains("one or two sentences"));
    }

    #[test]
    fn test_verdict_prompt_with_evidence() {
        let evidence = vec![Evidence::new(
            Claim::new("Population grew", 0.9, "demographics"),
            "Census shows growth",
            vec![Source::new("https://statcan.gc.ca", "Statistics Canada", "")],
        )];
        let prompt =
            VerdictPrompt::new("Some statement", &evidence, ExplanationDetail::Detailed).build();
        assert!(prompt.contains("1. Claim: Population grew"));
        assert!(prompt.contains("Finding: Census shows growth"));
        assert!(prompt.contains("Statistics Canada (https://statcan.gc.ca)"));
        assert!(prompt.contains("detailed paragraph"));
    }
}
