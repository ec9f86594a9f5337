use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One unit of a generated syllabus. Immutable once produced.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Topic {
    pub title: String,
    pub explanation: String,
    pub questions: [String; 2],
}

impl Topic {
    pub fn new(
        title: impl Into<String>,
        explanation: impl Into<String>,
        questions: [String; 2],
    ) -> Self {
        Topic {
            title: title.into(),
            explanation: explanation.into(),
            questions,
        }
    }

    /// Both questions as a numbered block, the way they are shown to the learner.
    pub fn numbered_questions(&self) -> String {
        self.questions
            .iter()
            .enumerate()
            .map(|(idx, q)| format!("{}. {}", idx + 1, q))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
