//! Follow-up question types
//!
//! A question thread has no server-side state. The provider hands back an
//! opaque continuation handle after every answer and the caller passes it in
//! with the next question.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque thread-continuation handle issued by the model provider.
///
/// The core forwards it unchanged and never interprets its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationId(String);

impl ContinuationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Wire form, for handing back to the provider or the client
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContinuationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Answer to one follow-up question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaAnswer {
    #[serde(rename = "response")]
    pub answer: String,
    /// Handle to pass with the next question in the same thread
    #[serde(rename = "response_id")]
    pub continuation_id: ContinuationId,
}

/// Complete record of one question turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub continuation_id: Option<ContinuationId>,
    pub query: String,
    pub grounding_context: String,
    pub answer: String,
    pub new_continuation_id: ContinuationId,
}

impl ConversationTurn {
    pub fn answer(&self) -> QaAnswer {
        QaAnswer {
            answer: self.answer.clone(),
            continuation_id: self.new_continuation_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuation_id_is_transparent() {
        let id = ContinuationId::new("resp_abc123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"resp_abc123\"");

        let parsed: ContinuationId = serde_json::from_str("\"resp_abc123\"").unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.as_str(), "resp_abc123");
    }

    #[test]
    fn test_answer_wire_names() {
        let answer = QaAnswer {
            answer: "It means why".to_string(),
            continuation_id: ContinuationId::new("resp_1"),
        };
        let value = serde_json::to_value(&answer).unwrap();
        assert_eq!(value["response"], "It means why");
        assert_eq!(value["response_id"], "resp_1");
    }
}
