use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Operator verdict on a candidate, stored as its upper-case name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateStatus {
    #[default]
    NoStatus,
    NotSelected,
    Potential,
    Selected,
}

impl CandidateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CandidateStatus::NoStatus => "NO_STATUS",
            CandidateStatus::NotSelected => "NOT_SELECTED",
            CandidateStatus::Potential => "POTENTIAL",
            CandidateStatus::Selected => "SELECTED",
        }
    }
}

/// A candidate's recorded interview call.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRow {
    pub id: i64,
    pub call_id: String,
    pub interview_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub candidate_status: Option<String>,
    pub tab_switch_count: Option<i32>,
    /// Call details as captured from the voice provider: transcript,
    /// recording_url, call_analysis.
    pub details: Option<Value>,
    /// Memoized analytics record. Present once analytics have been computed.
    pub analytics: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl ResponseRow {
    /// Transcript stored with the call details, if any.
    pub fn stored_transcript(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.get("transcript"))
            .and_then(|t| t.as_str())
            .filter(|t| !t.trim().is_empty())
    }
}
