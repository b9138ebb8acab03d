//! Translation orchestrator
//!
//! Composes the translation path:
//! deduplicate → script gate → model call → parse.
//!
//! Every step can exit early with a typed [`Error`]. The model call is the
//! only suspension point; nothing is retried here.

use std::sync::Arc;
use std::time::Instant;

use lyric_tutor_core::{Error, Operation, Result, TranslationResult};
use lyric_tutor_llm::{LanguageModel, TranslationRequestBuilder};
use lyric_tutor_text_processing::{
    arabic_char_count, contains_arabic, ResponseParser, VerseDeduplicator,
};

use crate::telemetry;

/// Runs one lyrics submission end to end
pub struct TranslationOrchestrator {
    model: Arc<dyn LanguageModel>,
    deduplicator: VerseDeduplicator,
    requests: TranslationRequestBuilder,
    parser: ResponseParser,
}

impl TranslationOrchestrator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            deduplicator: VerseDeduplicator::default(),
            requests: TranslationRequestBuilder::new(),
            parser: ResponseParser::new(),
        }
    }

    /// Replace the default deduplicator, e.g. to change the input limit
    pub fn with_deduplicator(mut self, deduplicator: VerseDeduplicator) -> Self {
        self.deduplicator = deduplicator;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Translate raw lyrics
    pub async fn translate(&self, lyrics: &str) -> Result<TranslationResult> {
        let result = self.run(lyrics).await;
        telemetry::record_request(Operation::Translation, &result);
        result
    }

    async fn run(&self, lyrics: &str) -> Result<TranslationResult> {
        let deduplicated = self.deduplicator.deduplicate(lyrics).map_err(|e| {
            tracing::error!(error = %e, input_bytes = lyrics.len(), "Verse deduplication failed");
            Error::Processing(format!("could not process lyrics: {}", e))
        })?;

        if deduplicated.trim().is_empty() || !contains_arabic(&deduplicated) {
            tracing::info!(
                input_bytes = lyrics.len(),
                arabic_chars = arabic_char_count(&deduplicated),
                "Non-Arabic lyrics rejected"
            );
            return Err(Error::InputRejected("not an Arabic song".to_string()));
        }

        let request = self.requests.build(&deduplicated);

        let start = Instant::now();
        let response = self.model.generate(request).await;
        telemetry::record_model_latency(Operation::Translation, start.elapsed());

        let response = response.map_err(|e| {
            tracing::error!(
                error = %e,
                model = self.model.model_name(),
                "Translation model call failed"
            );
            Error::upstream(Operation::Translation, e.to_string())
        })?;

        let result = self.parser.parse(&response.text).map_err(|e| {
            tracing::error!(
                error = %e,
                output_bytes = response.text.len(),
                "Could not parse translation output"
            );
            Error::upstream(Operation::Translation, format!("could not process translation: {}", e))
        })?;

        if result.is_empty() {
            tracing::warn!("Model output contained no dialect, lines or words");
        }

        tracing::info!(
            dialect = result.dialect.as_deref().unwrap_or("<none>"),
            lines = result.lines.len(),
            words = result.words.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Translation complete"
        );

        Ok(result)
    }
}
