//! Verse deduplication
//!
//! Song lyrics repeat choruses verbatim. Translating every repetition costs
//! tokens and clutters the word breakdown, so repeated verse blocks are
//! dropped before the text reaches the model.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Result, TextProcessingError};

/// Blank-line boundary: a newline followed by one or more blank lines.
/// Lines holding only spaces, tabs or a carriage return count as blank.
static VERSE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n(?:[ \t\r]*\n)+").expect("verse boundary pattern"));

/// Separator used when verses are joined back together
pub const VERSE_SEPARATOR: &str = "\n\n";

/// Default submission limit (64 KiB)
pub const DEFAULT_MAX_INPUT_BYTES: usize = 64 * 1024;

/// Removes repeated verse blocks while preserving first-occurrence order.
#[derive(Debug, Clone)]
pub struct VerseDeduplicator {
    max_input_bytes: usize,
}

impl Default for VerseDeduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INPUT_BYTES)
    }
}

impl VerseDeduplicator {
    pub fn new(max_input_bytes: usize) -> Self {
        Self { max_input_bytes }
    }

    /// Deduplicate verse blocks.
    ///
    /// Two blocks are the same verse when their trimmed text is identical.
    /// The first occurrence is kept in its original, untrimmed form; blocks
    /// that are empty after trimming are dropped. Idempotent.
    pub fn deduplicate(&self, text: &str) -> Result<String> {
        if text.len() > self.max_input_bytes {
            return Err(TextProcessingError::InputTooLarge {
                size: text.len(),
                limit: self.max_input_bytes,
            });
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut kept: Vec<&str> = Vec::new();

        for verse in VERSE_BOUNDARY.split(text) {
            let normalized = verse.trim();
            if !normalized.is_empty() && seen.insert(normalized) {
                kept.push(verse);
            }
        }

        let dropped = VERSE_BOUNDARY.split(text).count() - kept.len();
        if dropped > 0 {
            tracing::debug!(kept = kept.len(), dropped, "Removed repeated or empty verses");
        }

        Ok(kept.join(VERSE_SEPARATOR))
    }
}
