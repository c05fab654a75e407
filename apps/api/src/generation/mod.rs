// Structured Generation Engine
// Implements: prompt composition, model invocation, JSON parsing, question generation, memoized analytics.
// All model calls go through generator::StructuredGenerator; no direct Gemini calls from the flows or handlers.

pub mod analytics;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod questions;
