//! Follow-up question session
//!
//! A session holds no thread state. Each question carries the word it is
//! about, the song's narrative and the continuation handle returned by the
//! previous answer; the provider keeps the history behind that handle.

use std::sync::Arc;
use std::time::Instant;

use lyric_tutor_core::{
    ContinuationId, ConversationTurn, Error, Operation, QaAnswer, Result, TranslatedWord,
};
use lyric_tutor_llm::{LanguageModel, QuestionRequestBuilder};

use crate::telemetry;

pub struct ConversationSession {
    model: Arc<dyn LanguageModel>,
    requests: QuestionRequestBuilder,
}

impl ConversationSession {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            requests: QuestionRequestBuilder::default(),
        }
    }

    /// Cap answer length (default 500 tokens)
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.requests = QuestionRequestBuilder::new(max_output_tokens);
        self
    }

    /// Answer `query` about `word`.
    ///
    /// On failure the caller should keep its last good continuation handle
    /// so the same question can be retried.
    pub async fn ask(
        &self,
        word: &TranslatedWord,
        narrative: &str,
        query: &str,
        continuation: Option<ContinuationId>,
    ) -> Result<QaAnswer> {
        self.ask_turn(word, narrative, query, continuation)
            .await
            .map(|turn| turn.answer())
    }

    /// Like [`ask`](Self::ask), returning the full turn record
    pub async fn ask_turn(
        &self,
        word: &TranslatedWord,
        narrative: &str,
        query: &str,
        continuation: Option<ContinuationId>,
    ) -> Result<ConversationTurn> {
        let result = self.run(word, narrative, query, continuation).await;
        telemetry::record_request(Operation::Question, &result);
        result
    }

    async fn run(
        &self,
        word: &TranslatedWord,
        narrative: &str,
        query: &str,
        continuation: Option<ContinuationId>,
    ) -> Result<ConversationTurn> {
        let request = self.requests.build(word, narrative, query, continuation.clone());

        let start = Instant::now();
        let response = self.model.generate(request).await;
        telemetry::record_model_latency(Operation::Question, start.elapsed());

        let response = response.map_err(|e| {
            tracing::error!(
                error = %e,
                word = %word.arabic,
                continued = continuation.is_some(),
                "Question model call failed"
            );
            Error::upstream(Operation::Question, e.to_string())
        })?;

        tracing::debug!(
            word = %word.arabic,
            previous = continuation.as_ref().map(|c| c.as_str()).unwrap_or("<none>"),
            next = %response.continuation,
            "Question answered"
        );

        Ok(ConversationTurn {
            continuation_id: continuation,
            query: query.to_string(),
            grounding_context: word.grounding_text(),
            answer: response.text,
            new_continuation_id: response.continuation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use lyric_tutor_llm::{GenerateRequest, GenerateResponse, LlmError, QA_REFUSAL};

    // Mock model issuing sequential continuation ids
    struct MockModel {
        fail: bool,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl MockModel {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for MockModel {
        async fn generate(
            &self,
            request: GenerateRequest,
        ) -> std::result::Result<GenerateResponse, LlmError> {
            let mut requests = self.requests.lock();
            requests.push(request);
            if self.fail {
                return Err(LlmError::Timeout);
            }
            Ok(GenerateResponse {
                text: format!("answer {}", requests.len()),
                continuation: ContinuationId::new(format!("resp_{}", requests.len())),
            })
        }

        fn model_name(&self) -> &str {
            "mock-model"
        }
    }

    fn word() -> TranslatedWord {
        TranslatedWord {
            arabic: "كيفك".to_string(),
            translation: "how are you".to_string(),
            transliteration: "keefik".to_string(),
            base: "\"كيف\" (keef) (how)".to_string(),
            note: "Adds the suffix ik for a woman.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_request_is_grounded() {
        let model = MockModel::new(false);
        let session = ConversationSession::new(model.clone());

        let answer = session
            .ask(&word(), "Levantine\n\nHow are you?", "Is this formal?", None)
            .await
            .unwrap();
        assert_eq!(answer.answer, "answer 1");
        assert_eq!(answer.continuation_id.as_str(), "resp_1");

        let requests = model.requests.lock();
        let request = &requests[0];
        assert!(request.instructions.contains("Levantine\n\nHow are you?"));
        assert!(request.instructions.contains(QA_REFUSAL));
        assert_eq!(
            request.input[0].content,
            format!("{}\n\nIs this formal?", word().grounding_text())
        );
        assert_eq!(request.max_output_tokens, Some(500));
        assert_eq!(request.temperature, 0.0);
        assert!(request.continuation.is_none());
        assert!(request.persist);
    }

    #[tokio::test]
    async fn test_turn_record() {
        let session = ConversationSession::new(MockModel::new(false));
        let previous = ContinuationId::new("resp_0");

        let turn = session
            .ask_turn(&word(), "narrative", "Why ik?", Some(previous.clone()))
            .await
            .unwrap();
        assert_eq!(turn.continuation_id, Some(previous));
        assert_eq!(turn.query, "Why ik?");
        assert_eq!(turn.grounding_context, word().grounding_text());
        assert_eq!(turn.new_continuation_id.as_str(), "resp_1");
    }

    #[tokio::test]
    async fn test_failure_is_upstream_question() {
        let model = MockModel::new(true);
        let session = ConversationSession::new(model.clone());

        let err = session
            .ask(&word(), "narrative", "Why?", Some(ContinuationId::new("resp_9")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Upstream {
                operation: Operation::Question,
                ..
            }
        ));
        assert_eq!(
            err.user_message(),
            "Sorry, I couldn't process your question. Please try again."
        );
        assert_eq!(model.requests.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_output_cap_override() {
        let model = MockModel::new(false);
        let session = ConversationSession::new(model.clone()).with_max_output_tokens(120);

        session.ask(&word(), "n", "q", None).await.unwrap();
        assert_eq!(model.requests.lock()[0].max_output_tokens, Some(120));
    }
}
