use std::sync::Arc;

use crate::constants::prompts;
use crate::errors::AppResult;
use crate::models::domain::{Topic, UploadedDocument};
use crate::models::dto::llm_payloads::SyllabusPayload;
use crate::services::ingestion_service::{truncate_chars, IngestionService};
use crate::services::model_service::{ChatModel, CompletionRequest};

pub struct SyllabusService {
    model: Arc<dyn ChatModel>,
    ingestion: IngestionService,
    char_budget: usize,
    temperature: f32,
}

impl SyllabusService {
    pub fn new(
        model: Arc<dyn ChatModel>,
        ingestion: IngestionService,
        char_budget: usize,
        temperature: f32,
    ) -> Self {
        Self {
            model,
            ingestion,
            char_budget,
            temperature,
        }
    }

    /// Ingest the uploads and ask the model for a syllabus.
    ///
    /// Every failure (unreadable PDF, unreachable model, malformed JSON) comes back as an
    /// error for the caller to turn into an empty syllabus.
    pub async fn generate(&self, documents: Vec<UploadedDocument>) -> AppResult<Vec<Topic>> {
        let notes = self.ingestion.ingest_blocking(documents).await?;
        self.generate_from_text(&notes).await
    }

    pub async fn generate_from_text(&self, notes: &str) -> AppResult<Vec<Topic>> {
        let truncated = truncate_chars(notes, self.char_budget);
        if truncated.len() < notes.len() {
            log::info!(
                "Notes truncated to {} of {} chars",
                self.char_budget,
                notes.chars().count()
            );
        }

        let request = CompletionRequest::json(prompts::syllabus_prompt(truncated), self.temperature);
        let raw = self.model.complete(request).await?;
        let topics = SyllabusPayload::parse(&raw)?;

        log::info!("Generated syllabus with {} topics", topics.len());
        Ok(topics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::services::ingestion_service::PageTextExtractor;
    use crate::services::model_service::{MockChatModel, ResponseFormat};

    struct Utf8Extractor;

    impl PageTextExtractor for Utf8Extractor {
        fn extract_pages(&self, _name: &str, bytes: &[u8]) -> AppResult<Vec<String>> {
            Ok(vec![String::from_utf8_lossy(bytes).into_owned()])
        }
    }

    fn service(model: MockChatModel, budget: usize) -> SyllabusService {
        SyllabusService::new(
            Arc::new(model),
            IngestionService::new(Arc::new(Utf8Extractor), true),
            budget,
            0.3,
        )
    }

    #[actix_web::test]
    async fn generate_returns_topics_from_model_json() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .withf(|req| {
                req.response_format == ResponseFormat::JsonObject
                    && req.temperature == Some(0.3)
                    && req.prompt.contains("DOCUMENTO 1: t1.pdf")
            })
            .times(1)
            .returning(|_| {
                Ok(r#"{"temas":[{"titulo":"T1","explicacion":"...","preguntas":["Q1","Q2"]}]}"#
                    .to_string())
            });

        let topics = service(model, 18_000)
            .generate(vec![UploadedDocument::new("t1.pdf", b"apuntes".to_vec())])
            .await
            .expect("generation should succeed");

        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].questions, ["Q1".to_string(), "Q2".to_string()]);
    }

    #[actix_web::test]
    async fn notes_are_truncated_to_budget() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .withf(|req| req.prompt.contains("abcde") && !req.prompt.contains("abcdef"))
            .times(1)
            .returning(|_| {
                Ok(r#"{"temas":[{"titulo":"T","explicacion":"E","preguntas":["a","b"]}]}"#
                    .to_string())
            });

        let result = service(model, 5).generate_from_text("abcdefghij").await;
        assert!(result.is_ok());
    }

    #[actix_web::test]
    async fn malformed_json_is_generation_failure() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .returning(|_| Ok(r#"{"temas":[{"titulo":"T"}]}"#.to_string()));

        let err = service(model, 100).generate_from_text("x").await.unwrap_err();
        assert!(matches!(err, AppError::GenerationFailure(_)));
    }

    #[actix_web::test]
    async fn model_errors_propagate() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .returning(|_| Err(AppError::ModelError("503".to_string())));

        let err = service(model, 100).generate_from_text("x").await.unwrap_err();
        assert!(matches!(err, AppError::ModelError(_)));
    }
}
