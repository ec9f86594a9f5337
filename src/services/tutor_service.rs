use std::sync::Arc;

use crate::constants::prompts;
use crate::errors::AppResult;
use crate::models::domain::Topic;
use crate::services::model_service::{ChatModel, CompletionRequest};

/// Free-text side channels: none of these gate progress.
pub struct TutorService {
    model: Arc<dyn ChatModel>,
}

impl TutorService {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub async fn simplify(&self, topic: &Topic) -> AppResult<String> {
        self.model
            .complete(CompletionRequest::text(prompts::simplify_prompt(&topic.explanation)))
            .await
    }

    pub async fn answer_question(&self, topic: &Topic, question: &str) -> AppResult<String> {
        self.model
            .complete(CompletionRequest::text(prompts::chat_prompt(
                &topic.explanation,
                question,
            )))
            .await
    }

    pub async fn checklist(&self, topic: &Topic) -> AppResult<String> {
        self.model
            .complete(CompletionRequest::text(prompts::checklist_prompt(&topic.explanation)))
            .await
    }

    pub async fn grade_final_exam(
        &self,
        question: &str,
        answer: &str,
        topic: &Topic,
    ) -> AppResult<String> {
        self.model
            .complete(CompletionRequest::text(prompts::final_exam_grading_prompt(
                question,
                answer,
                &topic.explanation,
            )))
            .await
    }
}
