//! Classifier output: a sentiment label plus a confidence score.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MindMateError;

/// Score attached to every crisis verdict.
pub const CRISIS_SCORE: f32 = 0.95;

/// Score attached to every neutral verdict.
pub const NEUTRAL_SCORE: f32 = 0.5;

/// Upper bound for keyword-derived positive/negative scores.
pub const MAX_KEYWORD_SCORE: f32 = 0.95;

/// Sentiment label assigned to a piece of user text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Positive,
    Negative,
    Neutral,
    /// Self-harm or suicidal-ideation indicators were found.
    Crisis,
}

impl Label {
    /// All labels, in display order.
    pub const ALL: [Label; 4] = [
        Label::Positive,
        Label::Negative,
        Label::Neutral,
        Label::Crisis,
    ];

    /// Upper-case wire name (`"POSITIVE"`, `"CRISIS"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
            Self::Crisis => "CRISIS",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = MindMateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MindMateError::InvalidInput(format!("unknown sentiment label: {s}")))
    }
}

/// Result of classifying one piece of text.
///
/// Created once per classification call and never mutated. Deserialising
/// rejects scores outside `0.0..=1.0` and pins crisis and neutral verdicts to
/// their fixed scores, so a verdict read off the wire holds the same
/// invariants as one produced here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireVerdict")]
pub struct Verdict {
    pub label: Label,
    /// Confidence in the range `0.0..=1.0`.
    pub score: f32,
}

impl Verdict {
    /// The fixed crisis verdict.
    pub fn crisis() -> Self {
        Self {
            label: Label::Crisis,
            score: CRISIS_SCORE,
        }
    }

    /// The fixed neutral verdict.
    pub fn neutral() -> Self {
        Self {
            label: Label::Neutral,
            score: NEUTRAL_SCORE,
        }
    }

    /// Positive verdict with the score clamped into `0.0..=1.0`.
    pub fn positive(score: f32) -> Self {
        Self {
            label: Label::Positive,
            score: clamp_score(score),
        }
    }

    /// Negative verdict with the score clamped into `0.0..=1.0`.
    pub fn negative(score: f32) -> Self {
        Self {
            label: Label::Negative,
            score: clamp_score(score),
        }
    }

    pub fn is_crisis(&self) -> bool {
        self.label == Label::Crisis
    }
}

/// Unchecked wire form of [`Verdict`].
#[derive(Deserialize)]
struct WireVerdict {
    label: Label,
    score: f32,
}

impl TryFrom<WireVerdict> for Verdict {
    type Error = MindMateError;

    fn try_from(wire: WireVerdict) -> Result<Self, Self::Error> {
        if !wire.score.is_finite() || !(0.0..=1.0).contains(&wire.score) {
            return Err(MindMateError::InvalidInput(format!(
                "sentiment score must be within 0..=1, got {}",
                wire.score
            )));
        }
        Ok(match wire.label {
            Label::Crisis => Self::crisis(),
            Label::Neutral => Self::neutral(),
            Label::Positive => Self::positive(wire.score),
            Label::Negative => Self::negative(wire.score),
        })
    }
}

fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}
