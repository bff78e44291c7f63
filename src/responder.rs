//! Response selection.
//!
//! A [`ResponseTable`] holds candidate replies per verdict label and per mood
//! bucket. A [`Responder`] validates the table once at construction and then
//! picks a candidate uniformly at random for each request.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{MindMateError, Result};
use crate::mood::{MoodBucket, MoodLabel};
use crate::verdict::{Label, Verdict};

/// Every crisis candidate must contain at least one of these (case-insensitive).
pub const CRISIS_CALL_TO_ACTION: &[&str] = &["crisis", "emergency", "hotline", "helpline", "988"];

/// Candidate replies, indexed by verdict label and mood bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseTable {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub neutral: Vec<String>,
    /// Must name an urgent call to contact crisis or emergency services.
    pub crisis: Vec<String>,
    pub mood_positive: Vec<String>,
    pub mood_neutral: Vec<String>,
    pub mood_support: Vec<String>,
}

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| (*s).to_owned()).collect()
}

impl Default for ResponseTable {
    fn default() -> Self {
        Self {
            positive: owned(&[
                "That's wonderful to hear! I love seeing you in such a positive space.",
                "Your positive energy is really uplifting! It sounds like things are looking up for you.",
                "I'm so glad you're feeling this way! Celebrating the good moments is so important.",
            ]),
            negative: owned(&[
                "I hear you, and I can sense you're going through a tough time. That sounds really challenging.",
                "Thank you for sharing something so difficult with me. It takes courage to open up about hard feelings.",
                "I'm sorry you're feeling this way. Your emotions are completely valid.",
                "That must be difficult to deal with. Remember, you're not alone in this. Would you like to try a quick breathing exercise?",
            ]),
            neutral: owned(&[
                "I hear you. Sometimes okay is perfectly fine too. Is there anything specific you'd like to talk about today?",
                "Thanks for checking in. I'm here to listen to whatever is on your mind.",
                "I appreciate you sharing how you're feeling. What would be most helpful for our conversation today?",
            ]),
            crisis: owned(&[
                "I'm really concerned about what you're going through. You don't have to face this alone. Please reach out to a crisis helpline immediately.",
                "Your safety is the most important thing. Please contact emergency services or a crisis hotline immediately. You matter, and there are people who want to help you.",
                "Please don't wait. Call or text 988 to reach a crisis counselor right now, or text HOME to 741741. If you are in immediate danger, call emergency services.",
            ]),
            mood_positive: owned(&[
                "Thanks for sharing how you're feeling. That's wonderful to hear! What's been going well for you?",
                "Thanks for checking in! It's great that you're feeling good. What's been the highlight of your day?",
            ]),
            mood_neutral: owned(&[
                "Thanks for sharing how you're feeling. Sometimes okay is perfectly fine. Is there anything specific you'd like to talk about?",
                "Thanks for checking in. Okay days count too. Is there anything on your mind you'd like to talk through?",
            ]),
            mood_support: owned(&[
                "Thanks for sharing how you're feeling. I'm sorry you're having a tough time. I'm here to support you through this. What's been weighing on your mind?",
                "Thank you for telling me. It's okay not to feel okay, and you don't have to carry it alone. Would you like to talk about what's going on?",
                "I'm glad you checked in. Feelings like this can be heavy. Would it help to try a short breathing exercise together, or to talk it through?",
            ]),
        }
    }
}

impl ResponseTable {
    /// Candidates for a verdict label.
    pub fn for_label(&self, label: Label) -> &[String] {
        match label {
            Label::Positive => &self.positive,
            Label::Negative => &self.negative,
            Label::Neutral => &self.neutral,
            Label::Crisis => &self.crisis,
        }
    }

    /// Candidates for a mood bucket.
    pub fn for_mood(&self, bucket: MoodBucket) -> &[String] {
        match bucket {
            MoodBucket::Positive => &self.mood_positive,
            MoodBucket::Neutral => &self.mood_neutral,
            MoodBucket::Support => &self.mood_support,
        }
    }

    /// Check that every label and bucket has candidates and that every crisis
    /// candidate carries a call to action.
    ///
    /// # Errors
    ///
    /// Returns [`MindMateError::Config`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let sections: [(&str, &[String]); 7] = [
            ("positive", self.positive.as_slice()),
            ("negative", self.negative.as_slice()),
            ("neutral", self.neutral.as_slice()),
            ("crisis", self.crisis.as_slice()),
            ("mood_positive", self.mood_positive.as_slice()),
            ("mood_neutral", self.mood_neutral.as_slice()),
            ("mood_support", self.mood_support.as_slice()),
        ];
        for (name, candidates) in sections {
            if candidates.is_empty() {
                return Err(MindMateError::Config(format!(
                    "no candidate responses configured for `{name}`"
                )));
            }
            if let Some(i) = candidates.iter().position(|c| c.trim().is_empty()) {
                return Err(MindMateError::Config(format!(
                    "candidate response {i} for `{name}` is blank"
                )));
            }
        }

        for (i, candidate) in self.crisis.iter().enumerate() {
            let lower = candidate.to_lowercase();
            if !CRISIS_CALL_TO_ACTION.iter().any(|kw| lower.contains(kw)) {
                return Err(MindMateError::Config(format!(
                    "crisis response {i} does not direct the user to crisis or emergency services"
                )));
            }
        }
        Ok(())
    }
}

/// Picks replies from a validated [`ResponseTable`].
#[derive(Debug, Clone, Default)]
pub struct Responder {
    table: ResponseTable,
}

impl Responder {
    /// Validate `table` and build a responder over it.
    ///
    /// # Errors
    ///
    /// Returns [`MindMateError::Config`] if the table fails validation.
    pub fn new(table: ResponseTable) -> Result<Self> {
        table.validate()?;
        Ok(Self { table })
    }

    pub fn table(&self) -> &ResponseTable {
        &self.table
    }

    /// Reply to a verdict using the thread-local RNG.
    pub fn respond(&self, verdict: &Verdict) -> String {
        self.respond_with(verdict, &mut rand::thread_rng())
    }

    /// Reply to a mood selection using the thread-local RNG.
    pub fn respond_to_mood(&self, mood: MoodLabel) -> String {
        self.respond_to_mood_with(mood, &mut rand::thread_rng())
    }

    /// Reply to a verdict, drawing from `rng`.
    pub fn respond_with<R: Rng + ?Sized>(&self, verdict: &Verdict, rng: &mut R) -> String {
        pick(self.table.for_label(verdict.label), rng)
    }

    /// Reply to a mood selection, drawing from `rng`.
    pub fn respond_to_mood_with<R: Rng + ?Sized>(&self, mood: MoodLabel, rng: &mut R) -> String {
        pick(self.table.for_mood(mood.bucket()), rng)
    }
}

// Lists are non-empty once the table has been validated.
fn pick<R: Rng + ?Sized>(candidates: &[String], rng: &mut R) -> String {
    candidates.choose(rng).cloned().unwrap_or_default()
}
