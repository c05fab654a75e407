//! Structured Generation: turns a typed request into a validated, typed result
//! by delegating text generation to the upstream model.
//!
//! Flow: credential check → compose prompt → one model call → JSON parse →
//!       schema decode → semantic check → typed result.
//!
//! Every failure maps onto the same taxonomy regardless of which prompt
//! template is in use: ConfigurationMissing, Upstream, InvalidResponseFormat,
//! SchemaMismatch.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::Environment;
use crate::errors::AppError;
use crate::llm_client::prompts::compose_prompt;
use crate::llm_client::{strip_json_fences, LlmError, ModelInvocationConfig, TextGenerator};

/// Name of the credential reported when it is missing.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// A system instruction plus a function that renders the request-specific
/// instruction. Declared as constants next to the flow that uses them.
pub struct PromptTemplate<R> {
    pub system: &'static str,
    pub build: fn(&R) -> String,
}

impl<R> PromptTemplate<R> {
    pub fn compose(&self, request: &R) -> String {
        compose_prompt(self.system, &(self.build)(request))
    }
}

/// A JSON shape the model is expected to return.
pub trait StructuredResult: DeserializeOwned {
    /// Semantic checks serde cannot express (ranges, non-empty fields).
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// The generation service shared by every generation flow. Cheap to clone.
#[derive(Clone)]
pub struct StructuredGenerator {
    client: Arc<dyn TextGenerator>,
    api_key: Option<String>,
    model_config: ModelInvocationConfig,
    environment: Environment,
}

impl StructuredGenerator {
    pub fn new(
        client: Arc<dyn TextGenerator>,
        api_key: Option<String>,
        model_config: ModelInvocationConfig,
        environment: Environment,
    ) -> Self {
        Self {
            client,
            api_key,
            model_config,
            environment,
        }
    }

    pub fn model(&self) -> &str {
        &self.model_config.model
    }

    /// Generates with the service's default model configuration.
    pub async fn generate<R, T: StructuredResult>(
        &self,
        request: &R,
        template: &PromptTemplate<R>,
    ) -> Result<T, AppError> {
        self.generate_with(request, template, &self.model_config)
            .await
    }

    /// Generates with an explicit per-call model configuration.
    ///
    /// Makes at most one upstream call. A missing credential fails before the
    /// client is touched.
    pub async fn generate_with<R, T: StructuredResult>(
        &self,
        request: &R,
        template: &PromptTemplate<R>,
        config: &ModelInvocationConfig,
    ) -> Result<T, AppError> {
        let request_id = Uuid::new_v4();
        info!(%request_id, model = %config.model, "Structured generation requested");

        let Some(api_key) = self.api_key.as_deref() else {
            error!(%request_id, "{API_KEY_VAR} is not set");
            return Err(AppError::ConfigurationMissing(API_KEY_VAR));
        };

        let prompt = template.compose(request);

        let raw = self
            .client
            .generate_text(api_key, &prompt, config)
            .await
            .map_err(|e| {
                error!(%request_id, "Model invocation failed: {e}");
                self.upstream_failure(e)
            })?;

        let value = parse_json(&raw).map_err(|e| {
            error!(%request_id, raw = %raw, "Invalid JSON response from model: {e}");
            AppError::InvalidResponseFormat
        })?;

        let result: T = serde_json::from_value(value).map_err(|e| {
            error!(%request_id, "Model JSON did not match expected shape: {e}");
            AppError::SchemaMismatch(e.to_string())
        })?;

        result.check().map_err(|violation| {
            error!(%request_id, "Model JSON failed validation: {violation}");
            AppError::SchemaMismatch(violation)
        })?;

        info!(%request_id, "Structured generation succeeded");
        Ok(result)
    }

    fn upstream_failure(&self, err: LlmError) -> AppError {
        let details = (!self.environment.is_production()).then(|| format!("{err:?}"));
        AppError::Upstream {
            message: err.to_string(),
            details,
        }
    }
}

/// Parses model output as JSON, unwrapping a markdown code fence if present.
pub fn parse_json(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(strip_json_fences(raw))
}
