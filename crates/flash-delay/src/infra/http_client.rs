//! HTTP client for the delay endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::json;
use tracing::trace;

use crate::adapters::http::DelayPayload;
use crate::adapters::http::ErrorResponse;
use crate::domain::DelaySnapshot;
use crate::infra::config::ClientConfig;
use crate::usecases::ports::ApiError;
use crate::usecases::ports::Clock;
use crate::usecases::ports::DelayApi;

pub const DELAY_PATH: &str = "/api/delay";

pub struct HttpDelayApi {
    client: reqwest::Client,
    endpoint: Url,
    clock: Arc<dyn Clock>,
}

impl HttpDelayApi {
    pub fn new(config: &ClientConfig, clock: Arc<dyn Clock>) -> Result<Self, ApiError> {
        let endpoint = delay_endpoint(config.base_url())?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            clock,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn decode(&self, response: reqwest::Response) -> Result<DelaySnapshot, ApiError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        trace!(status = status.as_u16(), bytes = body.len(), "Delay response");

        if !status.is_success() {
            let (error, message) = match serde_json::from_slice::<ErrorResponse>(&body) {
                Ok(reply) => (reply.error, reply.message),
                Err(_) => (
                    status.canonical_reason().unwrap_or("error").to_string(),
                    String::from_utf8_lossy(&body).into_owned(),
                ),
            };
            return Err(ApiError::Status {
                status: status.as_u16(),
                error,
                message,
            });
        }

        let payload: DelayPayload =
            serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))?;
        if !payload.delay.is_finite() {
            return Err(ApiError::Decode("delay is not a finite number".to_string()));
        }
        Ok(payload.into_snapshot(self.clock.unix_ms()))
    }
}

#[async_trait]
impl DelayApi for HttpDelayApi {
    async fn fetch(&self) -> Result<DelaySnapshot, ApiError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        self.decode(response).await
    }

    async fn submit(&self, candidate: i64) -> Result<DelaySnapshot, ApiError> {
        self.submit_json(json!({ "delay": candidate })).await
    }
}

impl HttpDelayApi {
    /// Posts an arbitrary body. The CLI `set` command sends the user's text
    /// untouched so coercion happens server-side.
    pub async fn submit_json(&self, body: serde_json::Value) -> Result<DelaySnapshot, ApiError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        self.decode(response).await
    }
}

/// Accepts either a base URL or the full endpoint URL.
fn delay_endpoint(base: &str) -> Result<Url, ApiError> {
    let trimmed = base.trim().trim_end_matches('/');
    let full = if trimmed.ends_with(DELAY_PATH) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{DELAY_PATH}")
    };
    Url::parse(&full).map_err(|err| ApiError::Transport(format!("invalid URL {full:?}: {err}")))
}
