//! HTTP request handlers for the fact-check service.
//!
//! Implements the fact-check, retrieval and health check endpoints using axum.

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};
use verifact_pipeline::{FactCheckError, FactCheckOrchestrator, FactCheckRequest, FactCheckResponse};

/// Client identifier used when no usable address is known
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Pipeline shared by every request
    pub orchestrator: Arc<FactCheckOrchestrator>,
    /// Key rate limiting on `X-Forwarded-For` instead of the peer address
    pub trust_forwarded_for: bool,
}

impl AppState {
    /// State keyed on the peer address
    pub fn new(orchestrator: Arc<FactCheckOrchestrator>) -> Self {
        Self {
            orchestrator,
            trust_forwarded_for: false,
        }
    }

    /// Honor `X-Forwarded-For` when `trusted` (behind a rewriting proxy)
    pub fn with_trusted_forwarded_for(mut self, trusted: bool) -> Self {
        self.trust_forwarded_for = trusted;
        self
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Version reported in fact-check metadata
    pub model_version: String,
    /// Clients currently holding rate-limit records
    pub tracked_clients: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Pipeline error
    FactCheck(FactCheckError),
    /// Malformed request body
    BadRequest(String),
    /// Route exists but is not served
    NotImplemented(String),
}

/// Whole seconds for a `Retry-After` header, rounded up, at least 1
pub fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after
        .as_secs()
        .saturating_add(u64::from(retry_after.subsec_nanos() > 0));
    secs.max(1)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut retry_after = None;
        let (status, message) = match self {
            AppError::FactCheck(e) => {
                let status = match &e {
                    FactCheckError::RateLimited { retry_after: wait } => {
                        retry_after = Some(retry_after_secs(*wait));
                        StatusCode::TOO_MANY_REQUESTS
                    }
                    FactCheckError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    FactCheckError::Upstream { .. } if e.is_timeout() => {
                        StatusCode::GATEWAY_TIMEOUT
                    }
                    FactCheckError::Upstream { .. } => StatusCode::BAD_GATEWAY,
                };
                (status, e.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotImplemented(msg) => (StatusCode::NOT_IMPLEMENTED, msg),
        };

        if status.is_server_error() {
            error!("Request failed: {}", message);
        }

        let mut response = (status, Json(ErrorResponse { error: message })).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<FactCheckError> for AppError {
    fn from(e: FactCheckError) -> Self {
        AppError::FactCheck(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Identify the caller for rate limiting
///
/// The peer IP, then [`UNKNOWN_CLIENT`]. With `trust_forwarded_for` the first
/// `X-Forwarded-For` entry takes precedence; the header is client-controlled
/// unless a proxy rewrites it.
pub fn client_id(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .filter(|_| trust_forwarded_for)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .map(str::to_string);

    forwarded
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// POST /api/v1/factcheck - Fact-check a piece of text
async fn fact_check(
    State(state): State<AppState>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    body: Result<Json<FactCheckRequest>, JsonRejection>,
) -> Result<Json<FactCheckResponse>, AppError> {
    let Json(request) = body?;
    let client = client_id(
        &headers,
        peer.map(|ConnectInfo(addr)| addr),
        state.trust_forwarded_for,
    );
    debug!("Fact-check request from {}", client);

    let response = state.orchestrator.fact_check(&client, request).await?;
    Ok(Json(response))
}

/// GET /api/v1/factcheck/:id - Retrieve a stored fact-check
async fn get_fact_check(Path(id): Path<String>) -> AppError {
    AppError::NotImplemented(format!(
        "Retrieving fact-check {} is not implemented",
        id
    ))
}

/// GET /health - Liveness and limiter occupancy
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        model_version: state.orchestrator.config().model_version.clone(),
        tracked_clients: state.orchestrator.rate_limiter().tracked_clients(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/api/v1/factcheck", post(fact_check))
        .route("/api/v1/factcheck/:id", get(get_fact_check))
        .route("/health", get(health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_after_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_millis(1500)), 2);
        assert_eq!(retry_after_secs(Duration::from_secs(42)), 42);
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
        assert_eq!(retry_after_secs(Duration::from_millis(10)), 1);
        assert_eq!(retry_after_secs(Duration::MAX), u64::MAX);
    }

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_client_id_ignores_forwarded_for_by_default() {
        let headers = forwarded("203.0.113.7, 10.0.0.1");
        let peer: SocketAddr = "10.0.0.1:5000".parse().unwrap();
        assert_eq!(client_id(&headers, Some(peer), false), "10.0.0.1");
        assert_eq!(client_id(&headers, None, false), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_client_id_trusted_forwarded_for() {
        let headers = forwarded("203.0.113.7, 10.0.0.1");
        let peer: SocketAddr = "10.0.0.1:5000".parse().unwrap();
        assert_eq!(client_id(&headers, Some(peer), true), "203.0.113.7");
    }

    #[test]
    fn test_client_id_falls_back_to_peer() {
        let peer: SocketAddr = "192.0.2.1:5000".parse().unwrap();
        assert_eq!(client_id(&HeaderMap::new(), Some(peer), true), "192.0.2.1");
        assert_eq!(client_id(&forwarded("  "), Some(peer), true), "192.0.2.1");
    }

    #[test]
    fn test_client_id_unknown() {
        assert_eq!(client_id(&forwarded("  "), None, true), UNKNOWN_CLIENT);
    }
}
