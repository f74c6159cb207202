//! Pipeline configuration

use std::time::Duration;
use verifact_domain::FactCheckOptions;

/// Model version reported in response metadata
pub const DEFAULT_MODEL_VERSION: &str = "1.0.4";

/// Configuration for the fact-check orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Deadline for each individual stage call
    pub stage_timeout: Duration,

    /// Maximum input text length in bytes
    pub max_text_length: usize,

    /// Version string echoed in response metadata
    pub model_version: String,

    /// Defaults for option fields a request leaves out
    pub defaults: FactCheckOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_timeout: Duration::from_secs(60),
            max_text_length: 50_000,
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            defaults: FactCheckOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<(), String> {
        if self.stage_timeout.is_zero() {
            return Err("stage_timeout must be greater than 0".to_string());
        }
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        self.defaults.validate()
    }
}
