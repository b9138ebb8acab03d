//! Core types for the lyric tutor
//!
//! This crate provides the types shared by every other crate:
//! - Translation records (lines, words, narrative)
//! - The opaque continuation handle for follow-up questions
//! - The error taxonomy returned across the pipeline boundary

pub mod conversation;
pub mod error;
pub mod translation;

pub use conversation::{ContinuationId, ConversationTurn, QaAnswer};
pub use error::{Error, Operation, Result};
pub use translation::{TranslatedLine, TranslatedWord, TranslationResult};
