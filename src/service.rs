//! Stateless companion service: classify a turn, then pick a reply.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::classifier::{
    HttpModelConfig, HttpSentimentModel, KeywordRuleClassifier, ModelBackedClassifier,
    SafetyClassifier, SentimentClassifier,
};
use crate::config::{ClassifierBackend, ClassifierConfig, MindMateConfig};
use crate::error::{MindMateError, Result};
use crate::mood::MoodLabel;
use crate::responder::Responder;
use crate::verdict::Verdict;

/// Outcome of one chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub verdict: Verdict,
    pub response: String,
}

/// Classifier plus responder behind one handle.
///
/// Holds no per-conversation state; clone it freely across tasks.
#[derive(Debug, Clone)]
pub struct CompanionService {
    classifier: SafetyClassifier,
    responder: Arc<Responder>,
}

impl CompanionService {
    pub fn new(classifier: SafetyClassifier, responder: Responder) -> Self {
        Self {
            classifier,
            responder: Arc::new(responder),
        }
    }

    /// Keyword classifier with the built-in response table.
    pub fn keyword() -> Self {
        Self::new(SafetyClassifier::keyword(), Responder::default())
    }

    /// Build the service described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MindMateError::Config`] if the configuration is invalid,
    /// so misconfiguration is caught at startup rather than per request.
    pub fn from_config(config: &MindMateConfig) -> Result<Self> {
        config.validate()?;
        let responder = Responder::new(config.responses.clone())?;
        let inner = build_sentiment_classifier(&config.classifier)?;
        tracing::info!(backend = inner.name(), "companion service ready");
        Ok(Self::new(SafetyClassifier::new(inner), responder))
    }

    pub fn classifier(&self) -> &SafetyClassifier {
        &self.classifier
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    /// Classify `text` and pick a matching reply.
    ///
    /// # Errors
    ///
    /// Returns [`MindMateError::InvalidInput`] for empty or whitespace-only
    /// text.
    pub async fn reply(&self, text: &str) -> Result<Turn> {
        let verdict = self.classifier.classify(text).await?;
        let response = self.responder.respond(&verdict);
        if verdict.is_crisis() {
            tracing::warn!("crisis response issued");
        }
        Ok(Turn { verdict, response })
    }

    /// Reply to a verdict the caller already has.
    pub fn reply_to_verdict(&self, verdict: &Verdict) -> String {
        self.responder.respond(verdict)
    }

    /// Reply to a mood menu selection. The classifier is not consulted.
    pub fn reply_to_mood(&self, mood: MoodLabel) -> String {
        self.responder.respond_to_mood(mood)
    }
}

fn build_sentiment_classifier(config: &ClassifierConfig) -> Result<Arc<dyn SentimentClassifier>> {
    match config.backend {
        ClassifierBackend::Keyword => Ok(Arc::new(KeywordRuleClassifier::new())),
        ClassifierBackend::Http => {
            let url = config.model_url.as_deref().ok_or_else(|| {
                MindMateError::Config("http backend requires a model_url".to_owned())
            })?;
            let mut http = HttpModelConfig::new(url).with_timeout(config.timeout());
            if let Some(token) = &config.api_token {
                http = http.with_api_token(token.clone());
            }
            let classifier = ModelBackedClassifier::new(HttpSentimentModel::new(http))
                .with_timeout(config.timeout())
                .with_min_score(config.model_min_score);
            Ok(Arc::new(classifier))
        }
    }
}
