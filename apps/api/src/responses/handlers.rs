use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::generation::analytics::AnalyticsRequest;
use crate::generation::handlers::analytics_for_call;
use crate::models::response::{CandidateStatus, ResponseRow};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct GetCallRequest {
    pub id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCallResponse {
    pub call_response: Value,
    pub analytics: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub candidate_status: CandidateStatus,
}

async fn load_response(state: &AppState, call_id: &str) -> Result<ResponseRow, AppError> {
    state
        .responses
        .get_by_call_id(call_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Response for call {call_id} not found")))
}

/// POST /api/get-call
///
/// Call details are returned even when analytics cannot be produced; the
/// failure is logged and `analytics` is null.
pub async fn handle_get_call(
    State(state): State<AppState>,
    Json(req): Json<GetCallRequest>,
) -> Result<Json<GetCallResponse>, AppError> {
    let response = load_response(&state, &req.id).await?;

    let request = AnalyticsRequest {
        call_id: response.call_id.clone(),
        interview_id: response.interview_id.clone(),
        transcript: response.stored_transcript().unwrap_or_default().to_string(),
    };
    let analytics = match analytics_for_call(&state, &request).await {
        Ok(analytics) => analytics,
        Err(e) => {
            tracing::error!("Analytics unavailable for call {}: {e}", request.call_id);
            Value::Null
        }
    };

    Ok(Json(GetCallResponse {
        call_response: response.details.unwrap_or(Value::Null),
        analytics,
    }))
}

/// GET /api/responses/:call_id
pub async fn handle_get_response(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Result<Json<ResponseRow>, AppError> {
    Ok(Json(load_response(&state, &call_id).await?))
}

/// PATCH /api/responses/:call_id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
    Json(req): Json<StatusUpdate>,
) -> Result<StatusCode, AppError> {
    if !state
        .responses
        .update_candidate_status(&call_id, req.candidate_status)
        .await?
    {
        return Err(AppError::NotFound(format!("Response for call {call_id} not found")));
    }
    tracing::info!("Call {call_id} marked {}", req.candidate_status.as_str());
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/responses/:call_id
pub async fn handle_delete_response(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.responses.delete(&call_id).await? {
        return Err(AppError::NotFound(format!("Response for call {call_id} not found")));
    }
    tracing::info!("Deleted response for call {call_id}");
    Ok(StatusCode::NO_CONTENT)
}
