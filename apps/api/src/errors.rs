use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const INVALID_FORMAT_MESSAGE: &str = "Invalid response format from AI";
pub const SCHEMA_MISMATCH_MESSAGE: &str = "AI response did not match the expected shape";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// The first four variants are the generation taxonomy shared by every
/// generation entry point; the rest cover request and store failures.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} is not configured")]
    ConfigurationMissing(&'static str),

    /// The model replied with text that is not JSON. The text itself is logged
    /// where it is detected and never carried in the error.
    #[error("Invalid response format from AI")]
    InvalidResponseFormat,

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// `details` holds a diagnostic trace and is only populated outside production.
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },

    /// The analytics flow could not run for the call (unknown call id, no
    /// transcript). Reported as a 500 like every other analytics failure.
    #[error("{0}")]
    AnalyticsUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match self {
            AppError::ConfigurationMissing(var) => (
                "CONFIGURATION_MISSING",
                format!("{var} is not configured"),
                None,
            ),
            AppError::InvalidResponseFormat => {
                ("INVALID_RESPONSE_FORMAT", INVALID_FORMAT_MESSAGE.to_string(), None)
            }
            AppError::SchemaMismatch(_) => {
                ("SCHEMA_MISMATCH", SCHEMA_MISMATCH_MESSAGE.to_string(), None)
            }
            AppError::Upstream { message, details } => ("UPSTREAM_FAILURE", message, details),
            AppError::AnalyticsUnavailable(msg) => ("ANALYTICS_UNAVAILABLE", msg, None),
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg, None),
            AppError::NotFound(msg) => ("NOT_FOUND", msg, None),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "internal server error".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
            "status": status.as_u16(),
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, Json(body)).into_response()
    }
}
