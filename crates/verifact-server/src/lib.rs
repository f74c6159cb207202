//! VeriFact Server
//!
//! HTTP surface of the fact-check pipeline.
//!
//! Builds the language-model provider and the three stages once at startup,
//! shares them across requests behind a rate limiter, and serves:
//!
//! - `POST /api/v1/factcheck`
//! - `GET /api/v1/factcheck/:id` (not implemented, answers 501)
//! - `GET /health`

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod offline;

use config::{ConfigError, ProviderKind, ServerConfig};
use handlers::{create_router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};
use verifact_agents::{AgentConfig, LlmClaimDetector, LlmEvidenceHunter, LlmVerdictWriter};
use verifact_domain::traits::LlmProvider;
use verifact_llm::{ollama, openai, LlmError, OllamaProvider, OpenAiProvider};
use verifact_pipeline::{FactCheckOrchestrator, PipelineStages, RateLimitSweeper};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Provider construction error
    #[error("Failed to create LLM provider: {0}")]
    Provider(#[from] LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Wrap one provider in the three LLM-backed stages
pub fn llm_stages<L>(llm: L, agents: &AgentConfig, domain_hints: Vec<String>) -> PipelineStages
where
    L: LlmProvider + 'static,
{
    let llm = Arc::new(llm);
    PipelineStages::new(
        Arc::new(LlmClaimDetector::new(llm.clone(), agents.clone()).with_domain_hints(domain_hints)),
        Arc::new(LlmEvidenceHunter::new(llm.clone(), agents.clone())),
        Arc::new(LlmVerdictWriter::new(llm, agents.clone())),
    )
}

/// Build the pipeline stages described by `config`
pub fn build_stages(config: &ServerConfig) -> Result<PipelineStages, ServerError> {
    let llm = &config.llm;
    let retries = llm.max_retries.max(1);
    let hints: Vec<String> = config
        .pipeline_config()
        .defaults
        .domains
        .into_iter()
        .collect();

    let stages = match llm.provider {
        ProviderKind::Mock => offline::offline_stages(),
        ProviderKind::Ollama => {
            let provider = OllamaProvider::new(
                llm.endpoint.as_deref().unwrap_or(ollama::DEFAULT_ENDPOINT),
                llm.model.as_deref().unwrap_or("llama3"),
            )?
            .with_max_retries(retries);
            llm_stages(provider, &config.agents, hints)
        }
        ProviderKind::OpenAi => {
            let api_key = llm
                .api_key
                .as_deref()
                .ok_or_else(|| ConfigError::MissingField("llm.api_key".to_string()))?;
            let provider = OpenAiProvider::with_base_url(
                llm.endpoint.as_deref().unwrap_or(openai::DEFAULT_BASE_URL),
                api_key,
                llm.model.as_deref().unwrap_or(openai::DEFAULT_MODEL),
            )?
            .with_max_retries(retries);
            llm_stages(provider, &config.agents, hints)
        }
    };
    Ok(stages)
}

/// Build the orchestrator described by `config`
pub fn build_orchestrator(config: &ServerConfig) -> Result<FactCheckOrchestrator, ServerError> {
    let stages = build_stages(config)?;
    let limiter = Arc::new(config.rate_limiter()?);
    Ok(FactCheckOrchestrator::new(
        stages,
        limiter,
        config.pipeline_config(),
    ))
}

/// Start the HTTP server
///
/// Builds the pipeline, starts the rate-limit sweeper, and serves until
/// Ctrl+C.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting VeriFact server");
    info!("Bind address: {}", config.bind_addr());
    info!(
        "Rate limit: {} requests per {}s",
        config.rate_limit.limit, config.rate_limit.window_secs
    );
    info!("LLM provider: {:?}", config.llm.provider);
    if config.server.trust_forwarded_for {
        info!("Keying rate limits on X-Forwarded-For");
    }

    let orchestrator = Arc::new(build_orchestrator(&config)?);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let sweeper = RateLimitSweeper::new(
        Arc::clone(orchestrator.rate_limiter()),
        config.sweep_interval(),
    );
    let sweeper_handle = tokio::spawn(sweeper.run(async move {
        let _ = shutdown_rx.changed().await;
    }));

    let state = AppState::new(orchestrator)
        .with_trusted_forwarded_for(config.server.trust_forwarded_for);
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("VeriFact listening on {}", config.bind_addr());

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| ServerError::Server(e.to_string()));

    let _ = shutdown_tx.send(true);
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;
    info!("VeriFact server stopped");

    served
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_orchestrator_from_test_config() {
        let config = ServerConfig::default_test_config();
        let orchestrator = build_orchestrator(&config).unwrap();
        assert_eq!(orchestrator.rate_limiter().limit(), 10);
        assert_eq!(orchestrator.config().model_version, "1.0.4");
    }

    #[test]
    fn test_openai_without_key_fails() {
        let config = ServerConfig::default();
        assert!(build_stages(&config).is_err());
    }

    #[test]
    fn test_openai_with_key_builds() {
        let mut config = ServerConfig::default();
        config.llm.api_key = Some("sk-test".to_string());
        assert!(build_stages(&config).is_ok());
    }
}
