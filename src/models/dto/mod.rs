pub mod llm_payloads;
pub mod request;
pub mod response;
