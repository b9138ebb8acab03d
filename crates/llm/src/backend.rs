//! Model boundary
//!
//! Every component that needs generated text talks to a [`LanguageModel`].
//! Implementations are constructed once and injected as
//! `Arc<dyn LanguageModel>`, so tests can substitute a recording double.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use lyric_tutor_core::ContinuationId;

use crate::LlmError;

/// Message role. Instructions travel separately, so input is always user text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
        }
    }
}

/// Input message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// System-level instructions for this call
    pub instructions: String,
    /// Ordered input messages
    pub input: Vec<Message>,
    pub temperature: f32,
    /// Output cap; `None` leaves the provider default
    pub max_output_tokens: Option<u32>,
    /// Thread to continue, if any
    pub continuation: Option<ContinuationId>,
    /// Whether the provider should keep this call so it can be continued
    pub persist: bool,
}

impl GenerateRequest {
    /// Single user message, temperature 0, not persisted
    pub fn new(instructions: impl Into<String>, user_input: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            input: vec![Message::user(user_input)],
            temperature: 0.0,
            max_output_tokens: None,
            continuation: None,
            persist: false,
        }
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }

    /// Continue `continuation` when present
    pub fn continuing(mut self, continuation: Option<ContinuationId>) -> Self {
        self.continuation = continuation;
        self
    }

    pub fn persisted(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }
}

/// Generated text plus the handle that continues it
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResponse {
    pub text: String,
    pub continuation: ContinuationId,
}

/// Text generation backend
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a response. Implementations do not retry.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;

    /// Get model name
    fn model_name(&self) -> &str;
}
