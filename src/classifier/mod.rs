//! Sentiment and crisis classification.
//!
//! Classification runs in two stages:
//!
//! 1. **Crisis screen**: a synchronous substring scan for self-harm and
//!    suicidal-ideation phrases. A match returns the fixed crisis verdict and
//!    nothing else runs.
//! 2. **Sentiment**: a [`SentimentClassifier`] decides between positive,
//!    negative and neutral. Either the [`KeywordRuleClassifier`] or a
//!    [`ModelBackedClassifier`] that falls back to it.
//!
//! The crisis screen lives in [`SafetyClassifier`], outside both sentiment
//! variants, and always completes before any model call is dispatched.

pub mod http_model;
pub mod keyword;
pub mod model;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{MindMateError, Result};
use crate::lexicon;
use crate::verdict::Verdict;

pub use http_model::{HttpModelConfig, HttpSentimentModel};
pub use keyword::KeywordRuleClassifier;
pub use model::{ModelBackedClassifier, ModelPrediction, SentimentModel};

/// A positive/negative/neutral sentiment classifier.
///
/// Implementations receive trimmed, non-empty text that has already passed
/// the crisis screen. They must not fail: backend trouble is handled inside
/// the implementation.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Short name used in log fields.
    fn name(&self) -> &str;

    async fn classify(&self, text: &str) -> Verdict;
}

#[async_trait]
impl<C: SentimentClassifier + ?Sized> SentimentClassifier for Arc<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn classify(&self, text: &str) -> Verdict {
        (**self).classify(text).await
    }
}

/// Run the crisis screen on `text`.
///
/// Returns the crisis verdict if any crisis phrase occurs, case-insensitively.
pub fn screen_crisis(text: &str) -> Option<Verdict> {
    let lower = text.to_lowercase();
    lexicon::find_crisis_phrase(&lower).map(|phrase| {
        tracing::warn!(phrase, "crisis indicator matched");
        Verdict::crisis()
    })
}

/// Reject empty or whitespace-only text.
///
/// # Errors
///
/// Returns [`MindMateError::InvalidInput`] when `text` has no content.
pub fn validate_input(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(MindMateError::InvalidInput(
            "text must not be empty".to_owned(),
        ));
    }
    Ok(trimmed)
}

/// Classify `text` with the crisis screen and the keyword rules.
///
/// Synchronous and deterministic.
///
/// # Errors
///
/// Returns [`MindMateError::InvalidInput`] for empty or whitespace-only text.
pub fn classify(text: &str) -> Result<Verdict> {
    let text = validate_input(text)?;
    Ok(screen_crisis(text).unwrap_or_else(|| KeywordRuleClassifier.evaluate(text)))
}

/// Crisis screen in front of a sentiment classifier.
#[derive(Clone)]
pub struct SafetyClassifier {
    inner: Arc<dyn SentimentClassifier>,
}

impl SafetyClassifier {
    pub fn new(inner: Arc<dyn SentimentClassifier>) -> Self {
        Self { inner }
    }

    /// Safety classifier over the keyword rules only.
    pub fn keyword() -> Self {
        Self::new(Arc::new(KeywordRuleClassifier::new()))
    }

    /// Name of the wrapped sentiment classifier.
    pub fn backend_name(&self) -> &str {
        self.inner.name()
    }

    /// Classify `text`.
    ///
    /// The crisis screen runs before the inner classifier is awaited.
    ///
    /// # Errors
    ///
    /// Returns [`MindMateError::InvalidInput`] for empty or whitespace-only
    /// text. Backend failures never surface here.
    pub async fn classify(&self, text: &str) -> Result<Verdict> {
        let text = validate_input(text)?;
        if let Some(verdict) = screen_crisis(text) {
            return Ok(verdict);
        }
        let verdict = self.inner.classify(text).await;
        tracing::debug!(
            backend = self.inner.name(),
            label = %verdict.label,
            score = verdict.score,
            "classified message"
        );
        Ok(verdict)
    }
}

impl std::fmt::Debug for SafetyClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafetyClassifier")
            .field("inner", &self.inner.name())
            .finish()
    }
}
