pub mod feedback;
pub mod study_session;
pub mod study_state;
pub mod topic;
pub use feedback::Feedback;
pub use study_session::{StudySession, UploadedDocument};
pub use study_state::{ChatMessage, ChatRole, FinalExam, Phase, StudyState};
pub use topic::Topic;
