use std::env;
use secrecy::SecretString;

pub const PLACEHOLDER_API_KEY: &str = "TU_LLAVE_DE_GROQ_AQUI";

#[derive(Clone, Debug)]
pub struct Config {
    pub llm_api_key: SecretString,
    pub llm_api_base: String,
    pub llm_model: String,
    pub syllabus_char_budget: usize,
    pub passing_score: f32,
    pub generation_temperature: f32,
    pub grading_temperature: f32,
    pub tag_documents: bool,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: String,
    pub max_upload_bytes: usize,
    pub session_idle_minutes: i64,
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let api_key = env::var("LLM_API_KEY")
            .or_else(|_| env::var("GROQ_API_KEY"))
            .unwrap_or_else(|_| PLACEHOLDER_API_KEY.to_string());

        Self {
            llm_api_key: SecretString::from(api_key),
            llm_api_base: env::var("LLM_API_BASE")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
            llm_model: env::var("LLM_MODEL")
                .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string()),
            syllabus_char_budget: parsed_or("SYLLABUS_CHAR_BUDGET", 18_000),
            passing_score: parsed_or("PASSING_SCORE", 6.0),
            generation_temperature: parsed_or("GENERATION_TEMPERATURE", 0.3),
            grading_temperature: parsed_or("GRADING_TEMPERATURE", 0.2),
            tag_documents: parsed_or("TAG_DOCUMENTS", true),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: parsed_or("WEB_SERVER_PORT", 8080),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            max_upload_bytes: parsed_or("MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
            session_idle_minutes: parsed_or("SESSION_IDLE_MINUTES", 120),
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if the API key is the placeholder or a numeric setting is unusable
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let api_key = self.llm_api_key.expose_secret();

        if api_key == PLACEHOLDER_API_KEY || api_key.trim().is_empty() {
            panic!(
                "FATAL: LLM_API_KEY is not set! Set LLM_API_KEY (or GROQ_API_KEY) to the provider credential."
            );
        }

        if !(0.0..=10.0).contains(&self.passing_score) {
            panic!(
                "FATAL: PASSING_SCORE must be between 0 and 10, got {}",
                self.passing_score
            );
        }

        if self.syllabus_char_budget == 0 {
            panic!("FATAL: SYLLABUS_CHAR_BUDGET must be greater than zero.");
        }

        if self.max_upload_bytes == 0 {
            panic!("FATAL: MAX_UPLOAD_BYTES must be greater than zero.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            llm_api_key: SecretString::from("test_api_key".to_string()),
            llm_api_base: "http://127.0.0.1:9/v1".to_string(),
            llm_model: "test-model".to_string(),
            syllabus_char_budget: 8_000,
            passing_score: 6.0,
            generation_temperature: 0.3,
            grading_temperature: 0.2,
            tag_documents: true,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: "http://localhost:5173".to_string(),
            max_upload_bytes: 1024 * 1024,
            session_idle_minutes: 60,
        }
    }
}
