//! Text processing errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextProcessingError {
    #[error("Lyrics too large: {size} bytes exceeds limit of {limit}")]
    InputTooLarge { size: usize, limit: usize },
}

/// Failure to read the model's tagged output at all.
///
/// A well-formed block with missing sections is never a `ParseError`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed markup at byte {position}: {reason}")]
    Malformed { position: u64, reason: String },

    #[error("Unclosed element <{0}>")]
    Unclosed(String),

    #[error("Content outside the fragment root")]
    TrailingContent,
}

pub type Result<T> = std::result::Result<T, TextProcessingError>;
