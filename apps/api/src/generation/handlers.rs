//! Axum route handlers for the generation API.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::generation::analytics::{generate_analytics, AnalyticsOutcome, AnalyticsRequest};
use crate::generation::questions::{generate_questions, QuestionList, QuestionRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub response: QuestionList,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub analytics: Value,
    pub status: u16,
}

/// POST /api/generate-interview-questions
///
/// Generates interview questions from the job context in the body.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<QuestionsResponse>, AppError> {
    tracing::info!("generate-interview-questions request received");

    let response = generate_questions(&state.generator, &request).await?;

    Ok(Json(QuestionsResponse { response }))
}

/// POST /api/generate-analytics
///
/// Returns the call's analytics, computing and persisting them on first use.
pub async fn handle_generate_analytics(
    State(state): State<AppState>,
    Json(request): Json<AnalyticsRequest>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let analytics = analytics_for_call(&state, &request).await?;

    Ok(Json(AnalyticsResponse {
        analytics,
        status: 200,
    }))
}

/// Runs the memoized analytics flow and persists freshly computed records so
/// the next request for the same call is served from the store.
pub async fn analytics_for_call(
    state: &AppState,
    request: &AnalyticsRequest,
) -> Result<Value, AppError> {
    let outcome = generate_analytics(
        &state.generator,
        state.responses.as_ref(),
        state.interviews.as_ref(),
        request,
    )
    .await?;

    match outcome {
        AnalyticsOutcome::Stored(value) => Ok(value),
        AnalyticsOutcome::Computed(analytics) => {
            let value = analytics.into_value();
            if !state.responses.save_analytics(&request.call_id, &value).await? {
                tracing::warn!(
                    "Response for call {} disappeared before analytics were saved",
                    request.call_id
                );
            }
            Ok(value)
        }
    }
}
