use serde::Deserialize;
use validator::Validate;

pub const MAX_ANSWER_CHARS: u64 = 20_000;
pub const MAX_CHAT_CHARS: u64 = 4_000;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, max = 20000))]
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UploadDocumentParams {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

impl UploadDocumentParams {
    pub fn has_pdf_extension(&self) -> bool {
        self.name.to_ascii_lowercase().ends_with(".pdf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_valid_answer() {
        let request = SubmitAnswerRequest {
            answer: "El turnismo fue...".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_answer_rejected() {
        let request = SubmitAnswerRequest {
            answer: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_oversized_chat_rejected() {
        let request = ChatRequest {
            message: "x".repeat(MAX_CHAT_CHARS as usize + 1),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_answer_limit_matches_constant() {
        let request = SubmitAnswerRequest {
            answer: "x".repeat(MAX_ANSWER_CHARS as usize),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_pdf_extension_is_case_insensitive() {
        let params = UploadDocumentParams {
            name: "Tema 1.PDF".to_string(),
        };
        assert!(params.has_pdf_extension());

        let params = UploadDocumentParams {
            name: "notas.docx".to_string(),
        };
        assert!(!params.has_pdf_extension());
    }
}
