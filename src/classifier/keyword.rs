//! Keyword-count sentiment classifier.
//!
//! Counts distinct positive and negative keyword hits in the lower-cased text
//! and picks whichever side has more. Deterministic, allocation-light and
//! infallible; it is also the fallback for [`ModelBackedClassifier`].
//!
//! [`ModelBackedClassifier`]: super::model::ModelBackedClassifier

use async_trait::async_trait;

use super::SentimentClassifier;
use crate::lexicon::{NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS, count_matches};
use crate::verdict::{MAX_KEYWORD_SCORE, Verdict};

/// Rule-based classifier over the fixed keyword sets in [`crate::lexicon`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordRuleClassifier;

impl KeywordRuleClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify synchronously. Never returns [`Label::Crisis`].
    ///
    /// [`Label::Crisis`]: crate::verdict::Label::Crisis
    pub fn evaluate(&self, text: &str) -> Verdict {
        let lower = text.to_lowercase();
        let negative = count_matches(&lower, NEGATIVE_KEYWORDS);
        let positive = count_matches(&lower, POSITIVE_KEYWORDS);

        if positive > negative {
            Verdict::positive(keyword_score(positive))
        } else if negative > positive {
            Verdict::negative(keyword_score(negative))
        } else {
            Verdict::neutral()
        }
    }
}

#[async_trait]
impl SentimentClassifier for KeywordRuleClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn classify(&self, text: &str) -> Verdict {
        self.evaluate(text)
    }
}

/// `min(0.6 + 0.1 * hits, 0.95)`.
///
/// Computed in tenths so that e.g. three hits yields exactly `0.9`.
fn keyword_score(hits: usize) -> f32 {
    let tenths = hits.saturating_add(6).min(100) as f32;
    (tenths / 10.0).min(MAX_KEYWORD_SCORE)
}
