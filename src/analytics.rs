//! Rolling-window summary over reported interactions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::interaction::InteractionRecord;
use crate::mood::MoodLabel;
use crate::verdict::Label;

/// Default analytics window.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Label and mood counts over a time window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub sentiment_distribution: BTreeMap<Label, usize>,
    pub mood_distribution: BTreeMap<MoodLabel, usize>,
    pub total_interactions: usize,
    /// Fraction of windowed interactions classified as crisis.
    pub crisis_share: f64,
    pub window_days: i64,
    /// The windowed records themselves, oldest first.
    pub weekly_data: Vec<InteractionRecord>,
}

impl AnalyticsSummary {
    /// Summarise the records created within `window_days` of `now`.
    ///
    /// Records outside the window are ignored, so callers may pass an
    /// unfiltered history.
    pub fn from_records<'a, I>(records: I, now: DateTime<Utc>, window_days: i64) -> Self
    where
        I: IntoIterator<Item = &'a InteractionRecord>,
    {
        let since = window_start(now, window_days);
        let mut summary = Self {
            window_days,
            ..Self::default()
        };
        for record in records.into_iter().filter(|r| r.created_at >= since) {
            summary.total_interactions += 1;
            if let Some(verdict) = &record.verdict {
                *summary.sentiment_distribution.entry(verdict.label).or_default() += 1;
            }
            if let Some(mood) = record.mood {
                *summary.mood_distribution.entry(mood).or_default() += 1;
            }
            summary.weekly_data.push(record.clone());
        }
        summary.weekly_data.sort_by_key(|record| record.created_at);
        if summary.total_interactions > 0 {
            let crisis = summary
                .sentiment_distribution
                .get(&Label::Crisis)
                .copied()
                .unwrap_or(0);
            summary.crisis_share = crisis as f64 / summary.total_interactions as f64;
        }
        summary
    }
}

/// Start of a window of `window_days` ending at `now`.
pub fn window_start(now: DateTime<Utc>, window_days: i64) -> DateTime<Utc> {
    Duration::try_days(window_days.max(0))
        .and_then(|days| now.checked_sub_signed(days))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
