use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::study_state::StudyState;

/// A PDF staged for the next syllabus generation. The raw bytes never leave the process.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadedDocument {
    pub name: String,
    pub size_bytes: usize,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size_bytes: bytes.len(),
            bytes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct StudySession {
    pub id: Uuid,
    pub state: StudyState,
    #[serde(default)]
    pub documents: Vec<UploadedDocument>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl StudySession {
    pub fn new() -> Self {
        let now = Utc::now();
        StudySession {
            id: Uuid::new_v4(),
            state: StudyState::new(),
            documents: Vec::new(),
            created_at: now,
            modified_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

impl Default for StudySession {
    fn default() -> Self {
        Self::new()
    }
}
