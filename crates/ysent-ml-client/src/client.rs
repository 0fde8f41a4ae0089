//! ML service HTTP client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::error::{MlError, MlResult};
use crate::types::{HealthResponse, RateRequest, RateResponse, Rating};

/// Configuration for ML client.
#[derive(Debug, Clone)]
pub struct MlClientConfig {
    /// Base URL of ML service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries
    pub max_retries: u32,
}

impl Default for MlClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(300), // whole-run batches
            max_retries: 2,
        }
    }
}

impl MlClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Create config from environment variables.
    ///
    /// Returns `None` when `ML_SERVICE_URL` is unset or empty; the model
    /// classifier is then reported unavailable.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("ML_SERVICE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())?;

        Some(Self {
            timeout: Duration::from_secs(
                std::env::var("ML_SERVICE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            max_retries: std::env::var("ML_SERVICE_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            ..Self::new(base_url)
        })
    }
}

/// Client for the rating-model service.
pub struct MlClient {
    http: Client,
    config: MlClientConfig,
}

impl MlClient {
    /// Create a new ML client.
    pub fn new(config: MlClientConfig) -> MlResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(MlError::Network)?;

        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Check if ML service is healthy.
    pub async fn health_check(&self) -> MlResult<bool> {
        let url = format!("{}/health", self.config.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                debug!(status = %health.status, model = ?health.model, "ML service health");
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("ML service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("ML service health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Rate a batch of texts in one call.
    ///
    /// The result has exactly one [`Rating`] per input, in input order.
    pub async fn rate_batch(&self, inputs: &[String]) -> MlResult<Vec<Rating>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/rate", self.config.base_url);
        let request = RateRequest::new(inputs.to_vec());

        debug!(count = inputs.len(), "Sending rating batch to {}", url);

        let response: RateResponse = self
            .with_retry(|| async {
                let response = self
                    .http
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(MlError::Network)?;

                let status = response.status();
                if status == StatusCode::SERVICE_UNAVAILABLE || status == StatusCode::TOO_MANY_REQUESTS {
                    return Err(MlError::ServiceUnavailable(status.to_string()));
                }
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(MlError::RequestFailed(format!(
                        "ML service returned {}: {}",
                        status, body
                    )));
                }

                let bytes = response.bytes().await.map_err(MlError::Network)?;
                Ok(serde_json::from_slice::<RateResponse>(&bytes)?)
            })
            .await?;

        if response.predictions.len() != inputs.len() {
            return Err(MlError::CountMismatch {
                sent: inputs.len(),
                received: response.predictions.len(),
            });
        }

        Ok(response.predictions)
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> MlResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = MlResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "ML request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(MlError::RequestFailed("Unknown error".to_string())))
    }
}
