//! Interview analytics: transcript + main questions in, scored analysis out.
//!
//! Analytics are computed at most once per call: a stored record short-circuits
//! before any model call is made. The check is read-then-write with no lock, so
//! two concurrent first requests for the same call may both reach the model.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::generator::{PromptTemplate, StructuredGenerator, StructuredResult};
use crate::generation::prompts::{ANALYTICS_PROMPT_TEMPLATE, ANALYTICS_SYSTEM};
use crate::store::{InterviewStore, ResponseStore};

pub const MAIN_QUESTIONS_KEY: &str = "mainInterviewQuestions";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRequest {
    pub call_id: String,
    pub interview_id: String,
    /// Falls back to the transcript stored with the call when blank.
    #[serde(default)]
    pub transcript: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoredFeedback {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuestionSummary {
    pub question: String,
    #[serde(default)]
    pub summary: Option<String>,
}

/// The fields of an analytics record that get checked. Only `overallScore`
/// is required; everything else the call page renders when present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsScores {
    /// 0 – 100
    pub overall_score: f64,
    #[serde(default)]
    pub overall_feedback: Option<String>,
    /// score is 0 – 10
    #[serde(default)]
    pub communication: Option<ScoredFeedback>,
    #[serde(default)]
    pub question_summaries: Vec<QuestionSummary>,
}

/// An analytics record as the model returned it.
///
/// `scores` is the checked view; the record itself is kept as the model's
/// JSON object so keys the service does not know about, and integer scores,
/// reach the store unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Analytics {
    pub scores: AnalyticsScores,
    record: Map<String, Value>,
}

impl Analytics {
    /// Sets `mainInterviewQuestions`, replacing anything the model put there.
    pub fn stamp_main_questions(&mut self, questions: Vec<String>) {
        self.record.insert(
            MAIN_QUESTIONS_KEY.to_string(),
            Value::Array(questions.into_iter().map(Value::String).collect()),
        );
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.record)
    }
}

impl<'de> Deserialize<'de> for Analytics {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Map::deserialize(deserializer)?;
        let scores = serde_json::from_value(Value::Object(record.clone()))
            .map_err(serde::de::Error::custom)?;
        Ok(Analytics { scores, record })
    }
}

impl StructuredResult for Analytics {
    fn check(&self) -> Result<(), String> {
        let scores = &self.scores;
        if !(0.0..=100.0).contains(&scores.overall_score) {
            return Err(format!("overallScore {} out of range 0-100", scores.overall_score));
        }
        if let Some(score) = scores.communication.as_ref().and_then(|c| c.score) {
            if !(0.0..=10.0).contains(&score) {
                return Err(format!("communication.score {score} out of range 0-10"));
            }
        }
        Ok(())
    }
}

/// Either the record already stored for the call, or a freshly computed one
/// the caller still has to persist.
#[derive(Debug)]
pub enum AnalyticsOutcome {
    Stored(Value),
    Computed(Analytics),
}

/// Prompt input: transcript plus the numbered main questions.
pub struct AnalyticsPrompt {
    pub transcript: String,
    pub main_questions: String,
}

pub const ANALYTICS_TEMPLATE: PromptTemplate<AnalyticsPrompt> = PromptTemplate {
    system: ANALYTICS_SYSTEM,
    build: build_analytics_prompt,
};

fn build_analytics_prompt(input: &AnalyticsPrompt) -> String {
    let main_questions = if input.main_questions.is_empty() {
        "(no main questions recorded)"
    } else {
        input.main_questions.as_str()
    };
    ANALYTICS_PROMPT_TEMPLATE
        .replace("{transcript}", &input.transcript)
        .replace("{main_questions}", main_questions)
}

/// Renders questions as "1. first\n2. second".
pub fn number_questions(questions: &[String]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns stored analytics for the call, or computes new ones.
///
/// Steps:
/// 1. load the response by call id
/// 2. stored analytics present (and not JSON null) → return them unchanged, no model call
/// 3. load the interview's main questions (missing interview → no questions)
/// 4. pick the transcript: request first, stored call details second
/// 5. generate, then stamp `mainInterviewQuestions` with the question texts
///
/// Every failure is reported as a 500, like the generation errors.
pub async fn generate_analytics(
    generator: &StructuredGenerator,
    responses: &dyn ResponseStore,
    interviews: &dyn InterviewStore,
    request: &AnalyticsRequest,
) -> Result<AnalyticsOutcome, AppError> {
    let response = responses
        .get_by_call_id(&request.call_id)
        .await?
        .ok_or_else(|| {
            AppError::AnalyticsUnavailable(format!("Response for call {} not found", request.call_id))
        })?;

    if let Some(stored) = response.analytics.clone().filter(|v| !v.is_null()) {
        info!("Returning stored analytics for call {}", request.call_id);
        return Ok(AnalyticsOutcome::Stored(stored));
    }

    let questions: Vec<String> = match interviews.get_interview_by_id(&request.interview_id).await? {
        Some(interview) => interview
            .question_list()
            .into_iter()
            .map(|q| q.question)
            .collect(),
        None => {
            warn!(
                "Interview {} not found; analysing call {} without main questions",
                request.interview_id, request.call_id
            );
            Vec::new()
        }
    };

    let transcript = match request.transcript.trim() {
        "" => response.stored_transcript().map(str::to_string),
        t => Some(t.to_string()),
    }
    .ok_or_else(|| {
        AppError::AnalyticsUnavailable(format!("No transcript available for call {}", request.call_id))
    })?;

    let prompt = AnalyticsPrompt {
        transcript,
        main_questions: number_questions(&questions),
    };

    let mut analytics: Analytics = generator.generate(&prompt, &ANALYTICS_TEMPLATE).await?;
    analytics.stamp_main_questions(questions);

    info!(
        "Computed analytics for call {}: overall score {}",
        request.call_id, analytics.scores.overall_score
    );
    Ok(AnalyticsOutcome::Computed(analytics))
}
