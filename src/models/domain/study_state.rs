use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::domain::{feedback::Feedback, topic::Topic};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NoSyllabus,
    Studying,
    AwaitingGrading,
    Graded,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Essay drawn after the syllabus is completed. Graded narratively, never gated.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FinalExam {
    pub topic_index: usize,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
}

/// Everything one learner's session remembers between actions.
///
/// `current_index` stays below `syllabus.len()` whenever the syllabus is non-empty and
/// only moves forward within one syllabus.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct StudyState {
    pub phase: Phase,
    pub syllabus: Vec<Topic>,
    pub current_index: usize,
    pub last_feedback: Option<Feedback>,
    pub passed_current: bool,
    #[serde(default)]
    pub chats: BTreeMap<usize, Vec<ChatMessage>>,
    #[serde(default)]
    pub checklists: BTreeMap<usize, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_exam: Option<FinalExam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl Default for StudyState {
    fn default() -> Self {
        Self::new()
    }
}

impl StudyState {
    pub fn new() -> Self {
        StudyState {
            phase: Phase::NoSyllabus,
            syllabus: Vec::new(),
            current_index: 0,
            last_feedback: None,
            passed_current: false,
            chats: BTreeMap::new(),
            checklists: BTreeMap::new(),
            pending_answer: None,
            final_exam: None,
            last_error: None,
        }
    }

    pub fn current_topic(&self) -> Option<&Topic> {
        match self.phase {
            Phase::NoSyllabus => None,
            _ => self.syllabus.get(self.current_index),
        }
    }

    pub fn is_last_topic(&self) -> bool {
        !self.syllabus.is_empty() && self.current_index + 1 == self.syllabus.len()
    }

    pub fn current_chat(&self) -> &[ChatMessage] {
        self.chats
            .get(&self.current_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn current_checklist(&self) -> Option<&str> {
        self.checklists.get(&self.current_index).map(String::as_str)
    }
}
