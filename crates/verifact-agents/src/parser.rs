//! Parse LLM output into claims, evidence and verdicts

use crate::error::AgentError;
use serde_json::{Map, Value};
use tracing::warn;
use verifact_domain::{Claim, Evidence, Source, Verdict, VerdictLabel};

/// Parse a claim detection response
///
/// Accepts either a bare JSON array or an object with a `claims` array.
/// Malformed entries are skipped with a warning.
pub fn parse_claims(response: &str) -> Result<Vec<Claim>, AgentError> {
    let json = parse_json(response)?;

    let claims_array = match &json {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("claims")
            .and_then(|v| v.as_array())
            .ok_or_else(|| AgentError::InvalidFormat("Expected a 'claims' array".to_string()))?,
        _ => {
            return Err(AgentError::InvalidFormat(
                "Expected JSON array or object".to_string(),
            ))
        }
    };

    let mut claims = Vec::new();
    for (idx, claim_json) in claims_array.iter().enumerate() {
        match parse_claim_json(claim_json) {
            Ok(claim) => {
                if let Err(e) = claim.validate() {
                    warn!("Claim {} failed validation: {}", idx, e);
                    continue;
                }
                claims.push(claim);
            }
            Err(e) => {
                warn!("Failed to parse claim {}: {}", idx, e);
            }
        }
    }

    Ok(claims)
}

/// Parse an evidence response for `claim`
///
/// Returns `Ok(None)` when the answer carries neither a summary nor sources.
pub fn parse_evidence(response: &str, claim: &Claim) -> Result<Option<Evidence>, AgentError> {
    let json = parse_json(response)?;
    let obj = json
        .as_object()
        .ok_or_else(|| AgentError::InvalidFormat("Expected JSON object".to_string()))?;

    let summary = obj
        .get("summary")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .trim()
        .to_string();
    let sources = parse_sources(obj);

    if summary.is_empty() && sources.is_empty() {
        return Ok(None);
    }

    Ok(Some(Evidence::new(claim.clone(), summary, sources)))
}

/// Parse a verdict response
///
/// An unrecognized verdict label degrades to `unverified`; a missing
/// confidence or explanation is an error.
pub fn parse_verdict(response: &str) -> Result<Verdict, AgentError> {
    let json = parse_json(response)?;
    let obj = json
        .as_object()
        .ok_or_else(|| AgentError::InvalidFormat("Expected JSON object".to_string()))?;

    let raw_label = obj
        .get("verdict")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AgentError::InvalidFormat("Missing or invalid 'verdict'".to_string()))?;
    let label = raw_label.parse::<VerdictLabel>().unwrap_or_else(|e| {
        warn!("{}, treating as unverified", e);
        VerdictLabel::Unverified
    });

    let confidence = obj
        .get("confidence")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| AgentError::InvalidFormat("Missing or invalid 'confidence'".to_string()))?;

    let explanation = obj
        .get("explanation")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AgentError::InvalidFormat("Missing or invalid 'explanation'".to_string()))?;

    Ok(Verdict::new(label, confidence, explanation, parse_sources(obj)))
}

fn parse_json(response: &str) -> Result<Value, AgentError> {
    let json_str = extract_json(response)?;
    Ok(serde_json::from_str(&json_str)?)
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, AgentError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(AgentError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip first line (```json or ```) and last line (```)
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn parse_claim_json(json: &Value) -> Result<Claim, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Claim is not a JSON object".to_string())?;

    let text = obj
        .get("text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "Missing or invalid 'text'".to_string())?;

    let check_worthiness = obj
        .get("check_worthiness")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| "Missing or invalid 'check_worthiness'".to_string())?;

    let domain = obj
        .get("domain")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "Missing or invalid 'domain'".to_string())?;

    Ok(Claim::new(
        text.trim(),
        check_worthiness,
        domain.trim().to_ascii_lowercase(),
    ))
}

/// Sources without a url are dropped; order is kept.
fn parse_sources(obj: &Map<String, Value>) -> Vec<Source> {
    let Some(items) = obj.get("sources").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let url = item.get("url")?.as_str()?.trim();
            if url.is_empty() {
                return None;
            }
            let field = |name: &str| {
                item.get(name)
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string()
            };
            Some(Source::new(url, field("title"), field("excerpt")))
        })
        .collect()
}
