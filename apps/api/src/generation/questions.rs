//! Question generation: job context in, list of interview questions out.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::errors::AppError;
use crate::generation::generator::{PromptTemplate, StructuredGenerator, StructuredResult};
use crate::generation::prompts::{QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_SYSTEM};

pub const DEFAULT_QUESTION_COUNT: u32 = 5;
pub const MAX_QUESTION_COUNT: u32 = 20;

/// Job context supplied by the operator. Accepts the interview form's field
/// names (`name`, `objective`, `number`) as aliases.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    #[serde(alias = "name")]
    pub job_title: String,
    #[serde(default, alias = "objective")]
    pub description: String,
    #[serde(default = "default_question_count", alias = "number")]
    pub question_count: u32,
    #[serde(default)]
    pub question_types: Vec<String>,
    #[serde(default)]
    pub context: Option<String>,
}

fn default_question_count() -> u32 {
    DEFAULT_QUESTION_COUNT
}

impl QuestionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.job_title.trim().is_empty() {
            return Err(AppError::Validation("jobTitle cannot be empty".to_string()));
        }
        if !(1..=MAX_QUESTION_COUNT).contains(&self.question_count) {
            return Err(AppError::Validation(format!(
                "questionCount must be between 1 and {MAX_QUESTION_COUNT}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
}

/// Generated questions.
///
/// Serialized as a plain array of question objects, or as
/// `{questions, description}` when the model wrapped its list that way.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionList {
    pub questions: Vec<InterviewQuestion>,
    pub description: Option<String>,
}

impl Serialize for QuestionList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.description {
            None => self.questions.serialize(serializer),
            Some(description) => {
                let mut wrapped = serializer.serialize_struct("QuestionList", 2)?;
                wrapped.serialize_field("questions", &self.questions)?;
                wrapped.serialize_field("description", description)?;
                wrapped.end()
            }
        }
    }
}

/// Shapes the model has been seen to return for a question list.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionPayload {
    List(Vec<QuestionItem>),
    Wrapped {
        questions: Vec<QuestionItem>,
        #[serde(default)]
        description: Option<String>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionItem {
    Text(String),
    Object(InterviewQuestion),
}

impl<'de> Deserialize<'de> for QuestionList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (items, description) = match QuestionPayload::deserialize(deserializer)? {
            QuestionPayload::List(items) => (items, None),
            QuestionPayload::Wrapped { questions, description } => (questions, description),
        };
        let questions = items
            .into_iter()
            .map(|item| match item {
                QuestionItem::Text(question) => InterviewQuestion { question },
                QuestionItem::Object(q) => q,
            })
            .collect();
        Ok(QuestionList {
            questions,
            description,
        })
    }
}

impl StructuredResult for QuestionList {
    fn check(&self) -> Result<(), String> {
        if self.questions.is_empty() {
            return Err("question list is empty".to_string());
        }
        if let Some(i) = self.questions.iter().position(|q| q.question.trim().is_empty()) {
            return Err(format!("question {} is blank", i + 1));
        }
        Ok(())
    }
}

pub const QUESTIONS_TEMPLATE: PromptTemplate<QuestionRequest> = PromptTemplate {
    system: QUESTIONS_SYSTEM,
    build: build_questions_prompt,
};

fn build_questions_prompt(request: &QuestionRequest) -> String {
    let question_types = if request.question_types.is_empty() {
        "any mix appropriate for the role".to_string()
    } else {
        request.question_types.join(", ")
    };

    QUESTIONS_PROMPT_TEMPLATE
        .replace("{job_title}", request.job_title.trim())
        .replace("{description}", or_none(&request.description))
        .replace("{question_count}", &request.question_count.to_string())
        .replace("{question_types}", &question_types)
        .replace("{context}", or_none(request.context.as_deref().unwrap_or("")))
}

fn or_none(text: &str) -> &str {
    match text.trim() {
        "" => "(none provided)",
        t => t,
    }
}

/// Validates the request and asks the model for questions.
///
/// The model is trusted on count: a different number of questions than
/// requested is logged, not rejected.
pub async fn generate_questions(
    generator: &StructuredGenerator,
    request: &QuestionRequest,
) -> Result<QuestionList, AppError> {
    request.validate()?;

    let questions: QuestionList = generator.generate(request, &QUESTIONS_TEMPLATE).await?;

    if questions.questions.len() != request.question_count as usize {
        warn!(
            "Requested {} questions for '{}', model returned {}",
            request.question_count,
            request.job_title,
            questions.questions.len()
        );
    }

    Ok(questions)
}
