//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files: bind address, rate limiting, pipeline
//! limits, option defaults, the language-model provider and stage tuning.
//! A few environment variables override file values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use verifact_agents::AgentConfig;
use verifact_pipeline::{PipelineConfig, RateLimitError, RateLimiter, RequestOptions};

/// Environment variable holding the OpenAI API key
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";

/// Environment variable overriding the model name
pub const ENV_MODEL: &str = "OPENAI_MODEL";

/// Environment variable overriding the bind address (`host:port`)
pub const ENV_BIND: &str = "VERIFACT_BIND";

/// Longest accepted rate-limit window, in seconds (one day)
pub const MAX_WINDOW_SECS: u64 = 86_400;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<RateLimitError> for ConfigError {
    fn from(e: RateLimitError) -> Self {
        ConfigError::Invalid(e.to_string())
    }
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Client identification
    #[serde(default)]
    pub server: ServerSettings,

    /// Rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    /// Pipeline limits
    #[serde(default)]
    pub pipeline: PipelineSettings,

    /// Defaults for option fields a request leaves out
    #[serde(default)]
    pub defaults: RequestOptions,

    /// Language-model provider
    #[serde(default)]
    pub llm: LlmSettings,

    /// Stage tuning
    #[serde(default)]
    pub agents: AgentConfig,
}

/// `[server]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Key rate limiting on the first `X-Forwarded-For` entry
    ///
    /// Only enable behind a reverse proxy that overwrites the header;
    /// otherwise callers choose their own rate-limit key.
    pub trust_forwarded_for: bool,
}

/// `[rate_limit]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    /// Requests admitted per client per window
    pub limit: u32,

    /// Window length in seconds
    pub window_secs: u64,

    /// How often idle client records are swept, in seconds
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            limit: 10,
            window_secs: 60,
            sweep_interval_secs: 60,
        }
    }
}

/// `[pipeline]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Deadline per stage call, in seconds
    pub stage_timeout_secs: u64,

    /// Maximum input length in bytes
    pub max_text_length: usize,

    /// Version echoed in response metadata
    pub model_version: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        let defaults = PipelineConfig::default();
        Self {
            stage_timeout_secs: defaults.stage_timeout.as_secs(),
            max_text_length: defaults.max_text_length,
            model_version: defaults.model_version,
        }
    }
}

/// Which provider backs the stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Canned offline answers
    Mock,
    /// Local Ollama server
    Ollama,
    /// OpenAI-compatible chat completions
    OpenAi,
}

/// `[llm]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Provider kind
    pub provider: ProviderKind,

    /// Base URL; provider default when absent
    pub endpoint: Option<String>,

    /// Model name; provider default when absent
    pub model: Option<String>,

    /// API key (OpenAI only)
    pub api_key: Option<String>,

    /// Attempts per provider call
    pub max_retries: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            endpoint: None,
            model: None,
            api_key: None,
            max_retries: 3,
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            server: ServerSettings::default(),
            rate_limit: RateLimitSettings::default(),
            pipeline: PipelineSettings::default(),
            defaults: RequestOptions::default(),
            llm: LlmSettings::default(),
            agents: AgentConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file, apply environment overrides and validate
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(Some(path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults with environment overrides, validated
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::load(None)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file (or built-in defaults) and apply environment overrides
    ///
    /// Does not validate, so callers can adjust the result first.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config: ServerConfig = match path {
            Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
            None => ServerConfig::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Switch to the offline mock provider, keeping every other setting
    pub fn into_offline(mut self) -> Self {
        self.llm.provider = ProviderKind::Mock;
        self
    }

    /// Create a default configuration for testing
    ///
    /// Uses the offline mock provider, so no API key is needed.
    pub fn default_test_config() -> Self {
        ServerConfig {
            llm: LlmSettings {
                provider: ProviderKind::Mock,
                ..LlmSettings::default()
            },
            ..ServerConfig::default()
        }
    }

    /// Apply overrides from a variable lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = lookup(ENV_API_KEY) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.llm.model = Some(model);
        }
        if let Some(bind) = lookup(ENV_BIND) {
            self.set_bind_addr(&bind);
        }
    }

    /// Set address and port from `host:port`; a bare host keeps the port
    pub fn set_bind_addr(&mut self, bind: &str) {
        match bind.rsplit_once(':') {
            Some((host, port)) => match port.parse() {
                Ok(port) => {
                    self.bind_address = host.to_string();
                    self.bind_port = port;
                }
                Err(_) => self.bind_address = bind.to_string(),
            },
            None => self.bind_address = bind.to_string(),
        }
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit.limit == 0 {
            return Err(ConfigError::Invalid("rate_limit.limit must be greater than 0".into()));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit.window_secs must be greater than 0".into(),
            ));
        }
        if self.rate_limit.window_secs > MAX_WINDOW_SECS {
            return Err(ConfigError::Invalid(format!(
                "rate_limit.window_secs must be at most {}",
                MAX_WINDOW_SECS
            )));
        }
        if self.rate_limit.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit.sweep_interval_secs must be greater than 0".into(),
            ));
        }
        if self.llm.provider == ProviderKind::OpenAi
            && self.llm.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
        {
            return Err(ConfigError::MissingField(format!(
                "llm.api_key (or {})",
                ENV_API_KEY
            )));
        }
        self.agents.validate().map_err(ConfigError::Invalid)?;
        self.pipeline_config().validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Pipeline configuration derived from this file
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            stage_timeout: Duration::from_secs(self.pipeline.stage_timeout_secs),
            max_text_length: self.pipeline.max_text_length,
            model_version: self.pipeline.model_version.clone(),
            defaults: self.defaults.clone().resolve(&Default::default()),
        }
    }

    /// Build the rate limiter this file describes
    pub fn rate_limiter(&self) -> Result<RateLimiter, ConfigError> {
        Ok(RateLimiter::new(
            self.rate_limit.limit,
            Duration::from_secs(self.rate_limit.window_secs),
        )?)
    }

    /// Interval between rate-limit sweeps
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit.sweep_interval_secs)
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.rate_limit.limit, 10);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000

            [rate_limit]
            limit = 20
            window_secs = 30

            [pipeline]
            stage_timeout_secs = 15
            model_version = "2.0.0"

            [defaults]
            max_claims = 3
            domains = ["health", "science"]

            [llm]
            provider = "ollama"
            model = "llama3"

            [agents]
            max_sources_per_claim = 2
        "#;

        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.rate_limit.limit, 20);
        assert_eq!(config.rate_limit.sweep_interval_secs, 60);
        assert_eq!(config.llm.provider, ProviderKind::Ollama);
        assert_eq!(config.agents.max_sources_per_claim, 2);
        // Unset agent fields keep their defaults
        assert_eq!(config.agents.max_verdict_sources, 10);
        assert!(config.agents.structured_output);
        assert!(config.validate().is_ok());

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.stage_timeout, Duration::from_secs(15));
        assert_eq!(pipeline.model_version, "2.0.0");
        assert_eq!(pipeline.defaults.max_claims, 3);
        assert_eq!(pipeline.defaults.domains.len(), 2);
        // Unset defaults keep the built-in values
        assert_eq!(pipeline.defaults.min_check_worthiness, 0.3);
    }

    #[test]
    fn test_openai_requires_api_key() {
        let config = ServerConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_zero_limit_invalid() {
        let mut config = ServerConfig::default_test_config();
        config.rate_limit.limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_oversized_window_invalid() {
        let mut config = ServerConfig::default_test_config();
        config.rate_limit.window_secs = MAX_WINDOW_SECS;
        assert!(config.validate().is_ok());

        config.rate_limit.window_secs = u64::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_forwarded_for_untrusted_by_default() {
        assert!(!ServerConfig::default().server.trust_forwarded_for);

        let config: ServerConfig = toml::from_str("[server]\ntrust_forwarded_for = true").unwrap();
        assert!(config.server.trust_forwarded_for);
    }

    #[test]
    fn test_offline_keeps_file_settings() {
        let toml = r#"
            bind_port = 9100

            [rate_limit]
            limit = 3
            window_secs = 120

            [pipeline]
            model_version = "2.1.0"

            [llm]
            provider = "openai"
        "#;
        let config: ServerConfig = toml::from_str(toml).unwrap();
        // No API key, so the file alone does not validate
        assert!(config.validate().is_err());

        let config = config.into_offline();
        assert!(config.validate().is_ok());
        assert_eq!(config.llm.provider, ProviderKind::Mock);
        assert_eq!(config.bind_port, 9100);
        assert_eq!(config.rate_limit.limit, 3);
        assert_eq!(config.rate_limit.window_secs, 120);
        assert_eq!(config.pipeline_config().model_version, "2.1.0");
    }

    #[test]
    fn test_load_without_file_skips_validation() {
        // Defaults select openai; loading succeeds even when no key is set
        let config = ServerConfig::load(None).unwrap().into_offline();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_stage_timeout_invalid() {
        let mut config = ServerConfig::default_test_config();
        config.pipeline.stage_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_KEY, "sk-test"),
            (ENV_MODEL, "gpt-4o"),
            (ENV_BIND, "0.0.0.0:8080"),
        ]);
        let mut config = ServerConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.llm.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut config = ServerConfig::default();
        config.llm.api_key = Some("from-file".to_string());
        config.apply_overrides(|_| Some("  ".to_string()));
        assert_eq!(config.llm.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_bare_host_keeps_port() {
        let mut config = ServerConfig::default();
        config.set_bind_addr("0.0.0.0");
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
    }
}
