use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::interview::InterviewRow;
use crate::models::response::{CandidateStatus, ResponseRow};
use crate::store::{InterviewStore, ResponseStore};

/// PostgreSQL-backed store over the `response` and `interview` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseStore for PgStore {
    async fn get_by_call_id(&self, call_id: &str) -> Result<Option<ResponseRow>, AppError> {
        let row = sqlx::query_as::<_, ResponseRow>(
            r#"
            SELECT id, call_id, interview_id, name, email, candidate_status,
                   tab_switch_count, details, analytics, created_at
            FROM response
            WHERE call_id = $1
            "#,
        )
        .bind(call_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save_analytics(&self, call_id: &str, analytics: &Value) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE response SET analytics = $1 WHERE call_id = $2")
            .bind(analytics)
            .bind(call_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_candidate_status(
        &self,
        call_id: &str,
        status: CandidateStatus,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE response SET candidate_status = $1 WHERE call_id = $2")
            .bind(status.as_str())
            .bind(call_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, call_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM response WHERE call_id = $1")
            .bind(call_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl InterviewStore for PgStore {
    async fn get_interview_by_id(&self, id: &str) -> Result<Option<InterviewRow>, AppError> {
        let row = sqlx::query_as::<_, InterviewRow>(
            "SELECT id, name, objective, description, questions, created_at FROM interview WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
