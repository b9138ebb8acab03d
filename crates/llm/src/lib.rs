//! Language model integration
//!
//! Features:
//! - Injectable model boundary (`LanguageModel`)
//! - OpenAI Responses API backend with thread continuation
//! - Translation and follow-up question prompt construction

pub mod backend;
pub mod openai;
pub mod prompt;

pub use backend::{GenerateRequest, GenerateResponse, LanguageModel, Message, Role};
pub use openai::{OpenAIConfig, OpenAIResponsesBackend};
pub use prompt::{
    QuestionRequestBuilder, TranslationRequestBuilder, DEFAULT_QA_MAX_OUTPUT_TOKENS, QA_REFUSAL,
    TRANSLATION_INSTRUCTIONS,
};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}
