//! Learned-model sentiment classifier with keyword fallback.
//!
//! [`ModelBackedClassifier`] asks a [`SentimentModel`] for a prediction under a
//! deadline. If the model errors or the deadline passes, the request is
//! answered by the wrapped [`KeywordRuleClassifier`] instead. Callers never see
//! a backend error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use super::SentimentClassifier;
use super::keyword::KeywordRuleClassifier;
use crate::error::Result;
use crate::verdict::Verdict;

/// Default minimum model score for a positive/negative verdict.
pub const DEFAULT_MIN_MODEL_SCORE: f32 = 0.6;

/// Default deadline for one model call.
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_millis(1500);

/// Raw output of a binary sentiment model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    /// Model label, typically `POSITIVE` or `NEGATIVE`.
    pub label: String,
    pub score: f32,
}

impl ModelPrediction {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Map the prediction onto a verdict.
    ///
    /// Only confident POSITIVE/NEGATIVE predictions survive; everything else
    /// collapses to the fixed neutral verdict.
    pub fn to_verdict(&self, min_score: f32) -> Verdict {
        let label = self.label.trim();
        if self.score > min_score {
            if label.eq_ignore_ascii_case("positive") {
                return Verdict::positive(self.score);
            }
            if label.eq_ignore_ascii_case("negative") {
                return Verdict::negative(self.score);
            }
        }
        Verdict::neutral()
    }
}

/// A learned sentiment backend.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    /// Backend name used in log fields.
    fn name(&self) -> &str;

    /// Predict the sentiment of `text`.
    ///
    /// # Errors
    ///
    /// Returns [`MindMateError::Backend`](crate::error::MindMateError::Backend)
    /// when the backend cannot produce a prediction.
    async fn predict(&self, text: &str) -> Result<ModelPrediction>;
}

#[async_trait]
impl<M: SentimentModel + ?Sized> SentimentModel for Arc<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn predict(&self, text: &str) -> Result<ModelPrediction> {
        (**self).predict(text).await
    }
}

/// Classifier that prefers a learned model and degrades to keyword rules.
pub struct ModelBackedClassifier<M> {
    model: M,
    fallback: KeywordRuleClassifier,
    timeout: Duration,
    min_score: f32,
    /// Count of fallback activations (for observability).
    fallback_count: AtomicU32,
}

impl<M: SentimentModel> ModelBackedClassifier<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            fallback: KeywordRuleClassifier::new(),
            timeout: DEFAULT_MODEL_TIMEOUT,
            min_score: DEFAULT_MIN_MODEL_SCORE,
            fallback_count: AtomicU32::new(0),
        }
    }

    /// Set the per-call model deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the minimum model score for a positive/negative verdict.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Number of times the keyword fallback has answered a request.
    pub fn fallback_count(&self) -> u32 {
        self.fallback_count.load(Ordering::Relaxed)
    }

    fn degrade(&self, text: &str, reason: &str) -> Verdict {
        self.fallback_count.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            backend = self.model.name(),
            reason,
            "sentiment backend degraded, falling back to keyword rules"
        );
        self.fallback.evaluate(text)
    }
}

impl<M: SentimentModel> std::fmt::Debug for ModelBackedClassifier<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBackedClassifier")
            .field("model", &self.model.name())
            .field("timeout", &self.timeout)
            .field("min_score", &self.min_score)
            .field("fallback_count", &self.fallback_count())
            .finish()
    }
}

#[async_trait]
impl<M: SentimentModel> SentimentClassifier for ModelBackedClassifier<M> {
    fn name(&self) -> &str {
        "model"
    }

    async fn classify(&self, text: &str) -> Verdict {
        match tokio::time::timeout(self.timeout, self.model.predict(text)).await {
            Ok(Ok(prediction)) => {
                let verdict = prediction.to_verdict(self.min_score);
                tracing::debug!(
                    backend = self.model.name(),
                    model_label = %prediction.label,
                    model_score = prediction.score,
                    label = %verdict.label,
                    "model prediction"
                );
                verdict
            }
            Ok(Err(e)) => self.degrade(text, &e.to_string()),
            Err(_) => self.degrade(text, "timed out"),
        }
    }
}
