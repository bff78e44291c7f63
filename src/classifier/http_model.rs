//! HTTP client for a hosted binary sentiment model.
//!
//! Speaks the common inference-API shape: the request body is
//! `{"inputs": "<text>"}` and the response is either a flat list of
//! `{label, score}` candidates or that list wrapped in an outer array.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::model::{ModelPrediction, SentimentModel};
use crate::error::{MindMateError, Result};

/// Connection settings for [`HttpSentimentModel`].
#[derive(Debug, Clone)]
pub struct HttpModelConfig {
    /// Full inference URL.
    pub url: String,
    /// Optional bearer token.
    pub api_token: Option<String>,
    /// Transport-level timeout.
    pub timeout: Duration,
}

impl HttpModelConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_token: None,
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Sentiment model reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSentimentModel {
    config: HttpModelConfig,
    client: reqwest::Client,
}

impl HttpSentimentModel {
    pub fn new(config: HttpModelConfig) -> Self {
        let client = build_client(config.timeout);
        Self { config, client }
    }

    pub fn config(&self) -> &HttpModelConfig {
        &self.config
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "failed to build model HTTP client, using defaults without a transport timeout"
            );
            reqwest::Client::default()
        }
    }
}

#[async_trait]
impl SentimentModel for HttpSentimentModel {
    fn name(&self) -> &str {
        "http"
    }

    async fn predict(&self, text: &str) -> Result<ModelPrediction> {
        let mut request = self
            .client
            .post(&self.config.url)
            .json(&InferenceRequest { inputs: text });
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MindMateError::Backend("model request timed out".to_owned())
            } else {
                MindMateError::Backend(format!("model request failed: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MindMateError::Backend(format!(
                "model endpoint returned {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MindMateError::Backend(format!("failed to read model response: {e}")))?;
        parse_predictions(&body)
    }
}

/// Parse an inference response and return its highest-scoring candidate.
fn parse_predictions(body: &str) -> Result<ModelPrediction> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| MindMateError::Backend(format!("model response is not JSON: {e}")))?;

    let candidates = match value {
        serde_json::Value::Array(mut items) => {
            if items.first().is_some_and(serde_json::Value::is_array) {
                items.swap_remove(0)
            } else {
                serde_json::Value::Array(items)
            }
        }
        other => {
            return Err(MindMateError::Backend(format!(
                "unexpected model response: {other}"
            )));
        }
    };

    let predictions: Vec<ModelPrediction> = serde_json::from_value(candidates)
        .map_err(|e| MindMateError::Backend(format!("malformed model prediction: {e}")))?;

    predictions
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| MindMateError::Backend("model returned no predictions".to_owned()))
}
