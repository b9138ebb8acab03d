//! OpenAI Responses API backend
//!
//! Posts to `{endpoint}/responses`. Thread continuation uses the provider's
//! `previous_response_id`: the `id` of every response is returned as the
//! [`ContinuationId`] for the next call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use lyric_tutor_config::LlmSettings;
use lyric_tutor_core::ContinuationId;

use crate::backend::{GenerateRequest, GenerateResponse, LanguageModel, Message};
use crate::LlmError;

/// Configuration for the Responses API backend
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API base, e.g. `https://api.openai.com/v1`
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4.1".to_string(),
            timeout: Duration::from_secs(90),
        }
    }
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn from_settings(settings: &LlmSettings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone().unwrap_or_default(),
            model: settings.model.clone(),
            timeout: Duration::from_secs(settings.request_timeout_seconds),
        }
    }
}

/// Backend for the OpenAI Responses API
pub struct OpenAIResponsesBackend {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIResponsesBackend {
    pub fn new(config: OpenAIConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() && !config.endpoint.starts_with("http://localhost") {
            return Err(LlmError::Configuration(
                "API key required for remote endpoints".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn responses_url(&self) -> String {
        format!("{}/responses", self.config.endpoint.trim_end_matches('/'))
    }

    fn build_request<'a>(&'a self, request: &'a GenerateRequest) -> ResponsesRequest<'a> {
        ResponsesRequest {
            model: &self.config.model,
            instructions: &request.instructions,
            input: &request.input,
            temperature: request.temperature,
            max_output_tokens: request.max_output_tokens,
            previous_response_id: request.continuation.as_ref().map(|c| c.as_str()),
            store: request.persist,
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAIResponsesBackend {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let start = std::time::Instant::now();
        let body = self.build_request(&request);

        let response = self
            .client
            .post(self.responses_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = format!("HTTP {}: {}", status, error_text);
            return Err(if status.is_server_error() {
                LlmError::Network(detail)
            } else {
                LlmError::Api(detail)
            });
        }

        let response: ResponsesApiResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::InvalidResponse(e.to_string())
            }
        })?;

        tracing::debug!(
            model = %self.config.model,
            response_id = %response.id,
            continued = request.continuation.is_some(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Model response received"
        );

        Ok(GenerateResponse {
            text: response.output_text(),
            continuation: ContinuationId::new(response.id),
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// =============================================================================
// Responses API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: &'a [Message],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_response_id: Option<&'a str>,
    store: bool,
}

#[derive(Debug, Deserialize)]
struct ResponsesApiResponse {
    id: String,
    #[serde(default)]
    output: Vec<OutputItem>,
}

impl ResponsesApiResponse {
    /// Concatenated text of every `output_text` part, in order
    fn output_text(&self) -> String {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                OutputItem::Other => None,
            })
            .flatten()
            .filter_map(|part| match part {
                ContentPart::OutputText { text } => Some(text.as_str()),
                ContentPart::Other => None,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<ContentPart>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    OutputText { text: String },
    #[serde(other)]
    Other,
}
