//! Quick mood check: a fixed menu of self-reported moods.
//!
//! A mood selection bypasses the classifier and maps straight onto one of
//! three response buckets.
//!
//! Mood selections are not run through the crisis screen. The menu is a
//! closed set with no free text, and no label contains a crisis phrase; the
//! negative moods all land in [`MoodBucket::Support`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MindMateError;

/// A mood the user picked from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Great,
    Okay,
    Down,
    Anxious,
    Sad,
}

/// Coarse response bucket for a mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodBucket {
    Positive,
    Neutral,
    /// Down, anxious or sad: acknowledge and offer support.
    Support,
}

impl MoodLabel {
    /// Menu order.
    pub const ALL: [MoodLabel; 5] = [
        MoodLabel::Great,
        MoodLabel::Okay,
        MoodLabel::Down,
        MoodLabel::Anxious,
        MoodLabel::Sad,
    ];

    /// Menu display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Great => "Great",
            Self::Okay => "Okay",
            Self::Down => "Down",
            Self::Anxious => "Anxious",
            Self::Sad => "Sad",
        }
    }

    pub fn bucket(self) -> MoodBucket {
        match self {
            Self::Great => MoodBucket::Positive,
            Self::Okay => MoodBucket::Neutral,
            Self::Down | Self::Anxious | Self::Sad => MoodBucket::Support,
        }
    }

    /// The chat line a caller shows for this selection, e.g. "I'm feeling sad today".
    pub fn check_in_text(self) -> String {
        format!("I'm feeling {} today", self.as_str().to_lowercase())
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodLabel {
    type Err = MindMateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoodLabel::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MindMateError::InvalidInput(format!("unknown mood: {s}")))
    }
}
