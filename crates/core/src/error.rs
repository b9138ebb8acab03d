//! Error taxonomy shared by the translation pipeline and its callers

use std::fmt;

use thiserror::Error;

/// Which public operation an upstream failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Translation,
    Question,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Translation => write!(f, "translation"),
            Operation::Question => write!(f, "question"),
        }
    }
}

/// Errors surfaced by the pipeline's public operations.
///
/// The `Display` form carries internal detail for logs. Callers facing end
/// users should use [`Error::user_message`] instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Input the user should correct rather than resubmit
    #[error("Input rejected: {0}")]
    InputRejected(String),

    /// Local text-processing fault
    #[error("Processing error: {0}")]
    Processing(String),

    /// Model call or model-output failure; safe to retry
    #[error("Upstream error during {operation}: {detail}")]
    Upstream { operation: Operation, detail: String },
}

impl Error {
    pub fn upstream(operation: Operation, detail: impl Into<String>) -> Self {
        Error::Upstream {
            operation,
            detail: detail.into(),
        }
    }

    /// Stable message that is safe to show to the end user
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::InputRejected(_) => {
                "This doesn't appear to be an Arabic song. Please enter an Arabic song to translate."
            },
            Error::Processing(_) => {
                "Sorry, we couldn't process the entered lyrics. Please check the lyrics."
            },
            Error::Upstream {
                operation: Operation::Translation,
                ..
            } => "We encountered an issue processing the translation. Please try again.",
            Error::Upstream {
                operation: Operation::Question,
                ..
            } => "Sorry, I couldn't process your question. Please try again.",
        }
    }

    /// Whether resubmitting the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Upstream { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
