use serde::Serialize;
use uuid::Uuid;

use crate::models::domain::{ChatMessage, Feedback, Phase, UploadedDocument};

/// Everything a front end needs to draw the current screen. Built by `render`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyView {
    pub phase: Phase,
    pub topics_loaded: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<TopicView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    pub passed_current: bool,
    pub can_submit: bool,
    pub can_advance: bool,
    pub completed: bool,
    pub chat: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_exam: Option<FinalExamView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    /// 1-based
    pub position: usize,
    pub total: usize,
    pub fraction: f32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicView {
    pub index: usize,
    pub title: String,
    pub explanation: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalExamView {
    pub prompt: String,
    pub topic_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub view: StudyView,
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<UploadedDocument>,
}

#[derive(Debug, Serialize)]
pub struct SimplifiedExplanationResponse {
    pub topic_index: usize,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteSessionResponse {
    pub message: String,
}
