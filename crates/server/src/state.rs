//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;

use lyric_tutor_config::Settings;
use lyric_tutor_llm::{LanguageModel, OpenAIConfig, OpenAIResponsesBackend};
use lyric_tutor_pipeline::{ConversationSession, TranslationOrchestrator};
use lyric_tutor_text_processing::VerseDeduplicator;

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub translator: Arc<TranslationOrchestrator>,
    pub questions: Arc<ConversationSession>,
    /// Present when the Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build the pipeline around an already-constructed model
    pub fn new(config: Settings, model: Arc<dyn LanguageModel>) -> Self {
        let translator = TranslationOrchestrator::new(model.clone()).with_deduplicator(
            VerseDeduplicator::new(config.translation.max_lyrics_bytes),
        );
        let questions = ConversationSession::new(model)
            .with_max_output_tokens(config.translation.qa_max_output_tokens);

        Self {
            config: Arc::new(config),
            translator: Arc::new(translator),
            questions: Arc::new(questions),
            metrics: None,
        }
    }

    /// Build the pipeline around the configured OpenAI backend
    pub fn from_settings(config: Settings) -> Result<Self, ServerError> {
        let backend = OpenAIResponsesBackend::new(OpenAIConfig::from_settings(&config.llm))?;
        tracing::info!(
            endpoint = %config.llm.endpoint,
            model = %config.llm.model,
            "Model backend initialized"
        );
        Ok(Self::new(config, Arc::new(backend)))
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Upper bound on one handler's pipeline call
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.server.timeout_seconds)
    }
}
