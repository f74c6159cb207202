//! Shared HTTP plumbing for remote providers

use crate::LlmError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy for remote providers
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

/// POST `body` as JSON and decode the JSON answer
///
/// Transport failures and 5xx answers are retried with exponential backoff
/// (base, 2x base, 4x base, ...). 401/403, 404 and 429 are returned at once.
pub(crate) async fn post_json<Req, Resp>(
    client: &reqwest::Client,
    url: &str,
    body: &Req,
    bearer: Option<&str>,
    model: &str,
    policy: RetryPolicy,
) -> Result<Resp, LlmError>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let attempts_allowed = policy.max_retries.max(1);
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < attempts_allowed {
        let mut request = client.post(url).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return response.json::<Resp>().await.map_err(|e| {
                        LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                    });
                }
                match status {
                    reqwest::StatusCode::NOT_FOUND => {
                        return Err(LlmError::ModelNotAvailable(model.to_string()));
                    }
                    reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                        return Err(LlmError::Authentication(format!("HTTP {}", status)));
                    }
                    reqwest::StatusCode::TOO_MANY_REQUESTS => {
                        return Err(LlmError::RateLimitExceeded);
                    }
                    _ => {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                        if status.is_client_error() {
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
            }
        }

        attempts += 1;
        if attempts < attempts_allowed {
            let delay = policy.base_delay * 2u32.pow(attempts - 1);
            warn!("LLM call to {} failed (attempt {}), retrying in {:?}", url, attempts, delay);
            tokio::time::sleep(delay).await;
        }
    }

    debug!("LLM call to {} gave up after {} attempts", url, attempts);
    Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
}
