use std::sync::Arc;

use crate::generation::generator::StructuredGenerator;
use crate::store::{InterviewStore, ResponseStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub generator: StructuredGenerator,
    /// Postgres-backed when DATABASE_URL is set, in-memory otherwise.
    pub responses: Arc<dyn ResponseStore>,
    pub interviews: Arc<dyn InterviewStore>,
}
