//! Per-turn interaction reporting.
//!
//! The core never stores conversations. Callers that want a history report
//! one [`InteractionRecord`] per user turn; [`InteractionLog`] is a bounded,
//! in-process sink for them. Nothing is written to disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::mood::MoodLabel;
use crate::verdict::Verdict;

/// Default number of records kept by an [`InteractionLog`].
pub const DEFAULT_MAX_RECORDS: usize = 10_000;

/// Generate a fresh session id (`session_<32 hex chars>`).
pub fn new_session_id() -> String {
    format!("session_{}", Uuid::new_v4().simple())
}

/// What kind of user turn was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Free-text chat message.
    Message,
    /// Pick from the quick mood menu.
    MoodSelection,
}

/// One reported user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub id: String,
    pub session_id: String,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub content: String,
    #[serde(rename = "sentiment", default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<MoodLabel>,
    pub created_at: DateTime<Utc>,
}

impl InteractionRecord {
    /// Record a classified chat message.
    pub fn message(
        session_id: impl Into<String>,
        content: impl Into<String>,
        verdict: Option<Verdict>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            kind: InteractionKind::Message,
            content: content.into(),
            verdict,
            mood: None,
            created_at: Utc::now(),
        }
    }

    /// Record a mood menu selection.
    pub fn mood_selection(session_id: impl Into<String>, mood: MoodLabel) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            kind: InteractionKind::MoodSelection,
            content: mood.check_in_text(),
            verdict: None,
            mood: Some(mood),
            created_at: Utc::now(),
        }
    }

    /// Override the timestamp.
    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Bounded in-memory interaction sink. Oldest records are dropped first.
#[derive(Debug)]
pub struct InteractionLog {
    records: RwLock<VecDeque<InteractionRecord>>,
    max_records: usize,
}

impl Default for InteractionLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_RECORDS)
    }
}

impl InteractionLog {
    /// A log that keeps at most `max_records` records (minimum one).
    pub fn with_capacity(max_records: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::new()),
            max_records: max_records.max(1),
        }
    }

    pub async fn record(&self, record: InteractionRecord) {
        let mut records = self.records.write().await;
        if records.len() >= self.max_records {
            records.pop_front();
        }
        tracing::debug!(
            session_id = %record.session_id,
            kind = ?record.kind,
            "interaction recorded"
        );
        records.push_back(record);
    }

    /// Records for one session, oldest first.
    pub async fn for_session(&self, session_id: &str) -> Vec<InteractionRecord> {
        let mut out: Vec<InteractionRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect();
        out.sort_by_key(|r| r.created_at);
        out
    }

    /// Records created at or after `since`, oldest first.
    pub async fn since(&self, since: DateTime<Utc>) -> Vec<InteractionRecord> {
        let mut out: Vec<InteractionRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.created_at >= since)
            .cloned()
            .collect();
        out.sort_by_key(|r| r.created_at);
        out
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
