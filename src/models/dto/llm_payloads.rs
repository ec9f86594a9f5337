//! JSON shapes the model is asked to produce, and their strict validation.
//!
//! Keys stay in Spanish because the prompts describe them that way. Nothing from these
//! structs reaches the domain until `validate()` has passed.

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Feedback, Topic};
use crate::models::domain::feedback::MAX_SCORE;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$")
        .expect("CODE_FENCE is a valid regex pattern")
});

/// Models sometimes wrap JSON in a Markdown fence even in JSON mode.
pub fn strip_code_fence(raw: &str) -> &str {
    match CODE_FENCE.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => raw.trim(),
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
pub struct SyllabusPayload {
    #[validate(length(min = 1), nested)]
    pub temas: Vec<TopicPayload>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
pub struct TopicPayload {
    #[validate(custom(function = "not_blank"))]
    pub titulo: String,

    #[validate(custom(function = "not_blank"))]
    pub explicacion: String,

    #[validate(length(equal = 2), custom(function = "no_blank_questions"))]
    pub preguntas: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct GradePayload {
    #[validate(range(min = 0.0, max = 10.0))]
    #[serde(deserialize_with = "score_from_number_or_string")]
    #[schemars(with = "f32")]
    pub nota: f32,

    #[validate(custom(function = "not_blank"))]
    pub feedback: String,

    #[serde(default, deserialize_with = "text_from_string_or_list")]
    #[schemars(with = "String")]
    pub olvidos: String,

    #[serde(default)]
    pub como_llegar_al_10: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn no_blank_questions(questions: &[String]) -> Result<(), ValidationError> {
    if questions.iter().any(|q| q.trim().is_empty()) {
        return Err(ValidationError::new("blank_question"));
    }
    Ok(())
}

fn score_from_number_or_string<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let score = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    score
        .filter(|s| s.is_finite())
        .map(|s| s as f32)
        .ok_or_else(|| de::Error::custom(format!("score is not numeric: {}", value)))
}

fn text_from_string_or_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::One(s) => s,
        StringOrList::Many(items) => items.join("\n"),
    })
}

impl SyllabusPayload {
    /// Parse and validate a syllabus response. Any defect fails the whole syllabus.
    pub fn parse(raw: &str) -> AppResult<Vec<Topic>> {
        let payload: SyllabusPayload = serde_json::from_str(strip_code_fence(raw))
            .map_err(|e| AppError::GenerationFailure(format!("malformed syllabus JSON: {}", e)))?;

        payload
            .validate()
            .map_err(|e| AppError::GenerationFailure(format!("invalid syllabus: {}", e)))?;

        payload
            .temas
            .into_iter()
            .map(Topic::try_from)
            .collect()
    }
}

impl TryFrom<TopicPayload> for Topic {
    type Error = AppError;

    fn try_from(payload: TopicPayload) -> Result<Self, Self::Error> {
        let questions: [String; 2] = payload.preguntas.try_into().map_err(|qs: Vec<String>| {
            AppError::GenerationFailure(format!(
                "topic needs exactly two questions, got {}",
                qs.len()
            ))
        })?;

        Ok(Topic::new(
            payload.titulo.trim(),
            payload.explicacion.trim(),
            questions,
        ))
    }
}

impl GradePayload {
    pub fn parse(raw: &str) -> AppResult<Feedback> {
        let payload: GradePayload = serde_json::from_str(strip_code_fence(raw))
            .map_err(|e| AppError::GradingFailure(format!("malformed grading JSON: {}", e)))?;

        payload
            .validate()
            .map_err(|e| AppError::GradingFailure(format!("invalid grading: {}", e)))?;

        Ok(Feedback::from(payload))
    }
}

impl From<GradePayload> for Feedback {
    fn from(payload: GradePayload) -> Self {
        Feedback {
            score: payload.nota.clamp(0.0, MAX_SCORE),
            feedback: payload.feedback,
            omissions: payload.olvidos,
            path_to_top_score: payload
                .como_llegar_al_10
                .filter(|s| !s.trim().is_empty()),
        }
    }
}
