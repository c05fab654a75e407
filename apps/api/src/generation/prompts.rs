// All LLM prompt constants for the generation flows.
// The JSON-only suffix is appended by llm_client::prompts::compose_prompt.

/// System prompt for interview question generation.
pub const QUESTIONS_SYSTEM: &str = "You are an expert technical interviewer who designs \
    focused interview questions that help hiring managers identify candidates with strong \
    expertise and relevant project experience. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences.";

/// Question generation prompt template.
/// Replace: {job_title}, {description}, {question_count}, {question_types}, {context}
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Design interview questions for the following role.

ROLE: {job_title}

ROLE DESCRIPTION / INTERVIEW OBJECTIVE:
{description}

NUMBER OF QUESTIONS: {question_count}

QUESTION TYPES TO COVER: {question_types}

ADDITIONAL CONTEXT:
{context}

Guidelines:
1. Each question must be answerable in a spoken conversation of two to three minutes
2. Prefer questions about concrete experience and trade-offs over trivia
3. Order questions from warm-up to most demanding
4. Do NOT number the questions and do NOT repeat a question
5. Keep each question to one or two sentences

Return a JSON ARRAY with exactly {question_count} objects:
[
  {"question": "Walk me through a service you designed end to end. What would you change today?"}
]"#;

/// System prompt for post-interview analytics.
pub const ANALYTICS_SYSTEM: &str = "You are an expert in analyzing interview transcripts. \
    You evaluate candidates fairly and only from what they actually said. \
    You must only use the main questions provided and never invent or infer additional questions. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Analytics prompt template.
/// Replace: {transcript}, {main_questions}
pub const ANALYTICS_PROMPT_TEMPLATE: &str = r#"Analyse the following interview between an AI interviewer and a candidate.

TRANSCRIPT ("Agent" is the interviewer, "User" is the candidate):
{transcript}

MAIN INTERVIEW QUESTIONS:
{main_questions}

Return a JSON object with this EXACT schema:
{
  "overallScore": 72,
  "overallFeedback": "Two to three sentences justifying the overall score.",
  "communication": {
    "score": 7,
    "feedback": "One or two sentences on clarity, structure and listening."
  },
  "generalIntelligence": "A short paragraph on reasoning ability and depth of understanding.",
  "softSkillSummary": "A short paragraph on adaptability, collaboration and composure.",
  "questionSummaries": [
    {"question": "The main question, verbatim", "summary": "What the candidate said in answer to it."}
  ]
}

Scoring rules:
- overallScore is an integer from 0 to 100 covering communication, technical depth and relevance of answers
- communication.score is an integer from 0 to 10
- questionSummaries has one entry per main question, in the order given
- If a main question was not asked or not answered, set its summary to "Not asked" or "Not answered"
- Base every statement on the transcript; do NOT speculate beyond it"#;
