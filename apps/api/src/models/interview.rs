use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::generation::questions::InterviewQuestion;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub id: String,
    pub name: Option<String>,
    pub objective: Option<String>,
    pub description: Option<String>,
    /// JSON array of `{ "question": ... }` objects, in interview order.
    pub questions: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl InterviewRow {
    /// Decodes the stored question list. Entries that are not question
    /// objects are skipped rather than failing the whole interview.
    pub fn question_list(&self) -> Vec<InterviewQuestion> {
        self.questions
            .as_ref()
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|q| serde_json::from_value(q.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}
