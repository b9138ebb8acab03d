//! Lyric text processing
//!
//! This crate provides the deterministic parts of the translation pipeline:
//! - **Verse deduplication**: drop repeated chorus blocks before translation
//! - **Script detection**: admission gate for Arabic-script input
//! - **Response parsing**: read the model's tagged translation block
//!
//! # Example
//!
//! ```ignore
//! use lyric_tutor_text_processing::{contains_arabic, ResponseParser, VerseDeduplicator};
//!
//! let lyrics = VerseDeduplicator::default().deduplicate(raw)?;
//! if contains_arabic(&lyrics) {
//!     let result = ResponseParser::new().parse(&model_output)?;
//! }
//! ```

pub mod markup;
pub mod script;
pub mod verses;

mod error;

pub use error::{ParseError, Result, TextProcessingError};
pub use markup::{strip_separators, strip_tags, ResponseParser};
pub use script::{arabic_char_count, contains_arabic};
pub use verses::{VerseDeduplicator, DEFAULT_MAX_INPUT_BYTES, VERSE_SEPARATOR};
