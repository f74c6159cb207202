//! Configuration for the LLM-backed stages

use serde::{Deserialize, Serialize};

/// Configuration shared by the three LLM stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum sources requested per claim during evidence gathering
    pub max_sources_per_claim: usize,

    /// Maximum sources attached to a verdict
    pub max_verdict_sources: usize,

    /// Ask providers for JSON mode output
    pub structured_output: bool,
}

impl AgentConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_sources_per_claim == 0 {
            return Err("max_sources_per_claim must be greater than 0".to_string());
        }
        if self.max_verdict_sources == 0 {
            return Err("max_verdict_sources must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_sources_per_claim: 5,
            max_verdict_sources: 10,
            structured_output: true,
        }
    }
}
