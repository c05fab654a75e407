use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::interview::InterviewRow;
use crate::models::response::{CandidateStatus, ResponseRow};
use crate::store::{InterviewStore, ResponseStore};

/// Process-local store used when no database is configured, and in tests.
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    responses: RwLock<HashMap<String, ResponseRow>>,
    interviews: RwLock<HashMap<String, InterviewRow>>,
}

fn poisoned() -> AppError {
    AppError::Internal(anyhow!("memory store lock poisoned"))
}

impl MemoryStore {
    #[cfg(test)]
    pub fn insert_response(&self, row: ResponseRow) {
        self.responses
            .write()
            .unwrap()
            .insert(row.call_id.clone(), row);
    }

    #[cfg(test)]
    pub fn insert_interview(&self, row: InterviewRow) {
        self.interviews.write().unwrap().insert(row.id.clone(), row);
    }
}

#[async_trait]
impl ResponseStore for MemoryStore {
    async fn get_by_call_id(&self, call_id: &str) -> Result<Option<ResponseRow>, AppError> {
        let responses = self.responses.read().map_err(|_| poisoned())?;
        Ok(responses.get(call_id).cloned())
    }

    async fn save_analytics(&self, call_id: &str, analytics: &Value) -> Result<bool, AppError> {
        let mut responses = self.responses.write().map_err(|_| poisoned())?;
        Ok(match responses.get_mut(call_id) {
            Some(row) => {
                row.analytics = Some(analytics.clone());
                true
            }
            None => false,
        })
    }

    async fn update_candidate_status(
        &self,
        call_id: &str,
        status: CandidateStatus,
    ) -> Result<bool, AppError> {
        let mut responses = self.responses.write().map_err(|_| poisoned())?;
        Ok(match responses.get_mut(call_id) {
            Some(row) => {
                row.candidate_status = Some(status.as_str().to_string());
                true
            }
            None => false,
        })
    }

    async fn delete(&self, call_id: &str) -> Result<bool, AppError> {
        let mut responses = self.responses.write().map_err(|_| poisoned())?;
        Ok(responses.remove(call_id).is_some())
    }
}

#[async_trait]
impl InterviewStore for MemoryStore {
    async fn get_interview_by_id(&self, id: &str) -> Result<Option<InterviewRow>, AppError> {
        let interviews = self.interviews.read().map_err(|_| poisoned())?;
        Ok(interviews.get(id).cloned())
    }
}
