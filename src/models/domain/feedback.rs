use serde::{Deserialize, Serialize};

pub const MAX_SCORE: f32 = 10.0;

const ERROR_MARKER: &str = "Error";
const RETRY_HINT: &str = "Reintentar";

/// Grader output for one submitted answer. Overwritten by each new submission.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Feedback {
    pub score: f32,
    pub feedback: String,
    pub omissions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_to_top_score: Option<String>,
}

impl Feedback {
    /// Zero-score stand-in used when grading could not be completed.
    pub fn sentinel() -> Self {
        Feedback {
            score: 0.0,
            feedback: ERROR_MARKER.to_string(),
            omissions: ERROR_MARKER.to_string(),
            path_to_top_score: Some(RETRY_HINT.to_string()),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.score == 0.0 && self.feedback == ERROR_MARKER && self.omissions == ERROR_MARKER
    }

    /// Inclusive: a score equal to the threshold passes.
    pub fn passes(&self, passing_score: f32) -> bool {
        self.score >= passing_score
    }
}
