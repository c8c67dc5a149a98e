use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::models::simulation::{PredictionOutcome, PredictionPayload};

/// Failure taxonomy for one prediction call. The orchestrator collapses all
/// three into a single user-visible message, but the distinction survives
/// internally — `kind()` names the variant in log lines.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport never produced an HTTP response (refused, timeout, DNS)
    #[error("prediction service unreachable: {0}")]
    Unreachable(String),
    /// Service answered with a non-success status and (optionally) a
    /// structured `{"error": …}` body
    #[error("{0}")]
    Rejected(String),
    /// 2xx body matched neither known response shape
    #[error("prediction service returned an unrecognized response body")]
    MalformedResponse,
}

impl ClientError {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Unreachable(_) => "UNREACHABLE",
            ClientError::Rejected(_) => "REJECTED",
            ClientError::MalformedResponse => "MALFORMED_RESPONSE",
        }
    }
}

/// Seam between the orchestrator and the HTTP client, so lifecycle tests can
/// script the collaborator instead of standing up a server.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, payload: &PredictionPayload) -> Result<PredictionOutcome, ClientError>;
}

/// HTTP client for the external prediction service. Single-shot: exactly one
/// outbound call per `predict`, no retries, no caching.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl PredictionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl PredictionService for PredictionClient {
    async fn predict(&self, payload: &PredictionPayload) -> Result<PredictionOutcome, ClientError> {
        let url = format!("{}/predict", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| {
                    format!("prediction service rejected the request (HTTP {})", status.as_u16())
                });
            return Err(ClientError::Rejected(message));
        }

        serde_json::from_str::<PredictionOutcome>(&body)
            .map_err(|_| ClientError::MalformedResponse)
    }
}
