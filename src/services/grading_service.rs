use std::sync::Arc;

use crate::constants::prompts;
use crate::errors::AppResult;
use crate::models::domain::{Feedback, Topic};
use crate::models::dto::llm_payloads::GradePayload;
use crate::services::model_service::{ChatModel, CompletionRequest};

/// Result of one grading call. `error` is set when `feedback` is the sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingOutcome {
    pub feedback: Feedback,
    pub error: Option<String>,
}

pub struct GradingService {
    model: Arc<dyn ChatModel>,
    temperature: f32,
}

impl GradingService {
    pub fn new(model: Arc<dyn ChatModel>, temperature: f32) -> Self {
        Self { model, temperature }
    }

    pub async fn try_grade(&self, topic: &Topic, answer: &str) -> AppResult<Feedback> {
        let prompt = prompts::grading_prompt(&topic.numbered_questions(), answer, &topic.explanation);
        let raw = self
            .model
            .complete(CompletionRequest::json(prompt, self.temperature))
            .await?;
        GradePayload::parse(&raw)
    }

    /// Never fails: any model or parse error becomes the zero-score sentinel.
    pub async fn grade(&self, topic: &Topic, answer: &str) -> GradingOutcome {
        match self.try_grade(topic, answer).await {
            Ok(feedback) => {
                log::info!("Graded answer for '{}': {}", topic.title, feedback.score);
                GradingOutcome {
                    feedback,
                    error: None,
                }
            }
            Err(e) => {
                log::warn!("Grading failed for '{}': {}", topic.title, e);
                GradingOutcome {
                    feedback: Feedback::sentinel(),
                    error: Some(format!("Error en la calificación: {}", e)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::services::model_service::{MockChatModel, ResponseFormat};
    use crate::test_utils::fixtures::test_topic;

    #[actix_web::test]
    async fn grade_parses_model_feedback() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .withf(|req| {
                req.response_format == ResponseFormat::JsonObject
                    && req.temperature == Some(0.2)
                    && req.prompt.contains("1. Pregunta 1.1\n2. Pregunta 1.2")
                    && req.prompt.contains("Explicación detallada del tema 1")
                    && req.prompt.contains("mi respuesta")
            })
            .times(1)
            .returning(|_| {
                Ok(r#"{"nota":7.5,"feedback":"Bien","olvidos":"Nada","como_llegar_al_10":"Fechas"}"#
                    .to_string())
            });

        let outcome = GradingService::new(Arc::new(model), 0.2)
            .grade(&test_topic(1), "mi respuesta")
            .await;

        assert!(outcome.error.is_none());
        assert_eq!(outcome.feedback.score, 7.5);
        assert_eq!(outcome.feedback.path_to_top_score.as_deref(), Some("Fechas"));
    }

    #[actix_web::test]
    async fn malformed_response_becomes_sentinel() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .returning(|_| Ok("no es json".to_string()));

        let outcome = GradingService::new(Arc::new(model), 0.2)
            .grade(&test_topic(1), "respuesta")
            .await;

        assert!(outcome.feedback.is_sentinel());
        assert!(outcome.error.is_some());
    }

    #[actix_web::test]
    async fn unreachable_model_becomes_sentinel() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .returning(|_| Err(AppError::ModelError("connection refused".to_string())));

        let outcome = GradingService::new(Arc::new(model), 0.2)
            .grade(&test_topic(1), "respuesta")
            .await;

        assert_eq!(outcome.feedback, Feedback::sentinel());
        assert!(outcome
            .error
            .as_deref()
            .is_some_and(|e| e.contains("connection refused")));
    }
}
