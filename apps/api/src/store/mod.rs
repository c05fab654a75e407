//! Narrow access to the interview and response records.
//!
//! Generation only needs to read a response by call id, read an interview's
//! question list, and write back computed analytics. Handlers receive the
//! stores as trait objects so the backing store can be swapped at startup.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::interview::InterviewRow;
use crate::models::response::{CandidateStatus, ResponseRow};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait ResponseStore: Send + Sync {
    async fn get_by_call_id(&self, call_id: &str) -> Result<Option<ResponseRow>, AppError>;

    /// Returns false when no response exists for `call_id`.
    async fn save_analytics(&self, call_id: &str, analytics: &Value) -> Result<bool, AppError>;

    /// Returns false when no response exists for `call_id`.
    async fn update_candidate_status(
        &self,
        call_id: &str,
        status: CandidateStatus,
    ) -> Result<bool, AppError>;

    /// Returns false when no response exists for `call_id`.
    async fn delete(&self, call_id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait InterviewStore: Send + Sync {
    async fn get_interview_by_id(&self, id: &str) -> Result<Option<InterviewRow>, AppError>;
}
