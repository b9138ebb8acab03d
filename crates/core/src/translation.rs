//! Translation record types
//!
//! These are the typed form of the tagged block the model returns for a
//! translation request. Every sub-field is a plain string that defaults to
//! empty, because the model frequently omits fields.

use serde::{Deserialize, Serialize};

/// One source lyric line with its transliteration and English rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedLine {
    #[serde(default)]
    pub arabic: String,
    #[serde(default)]
    pub transliteration: String,
    #[serde(default)]
    pub translation: String,
}

/// Word-level breakdown entry
///
/// `base` is the dictionary form as written by the model, usually
/// `"<root>" (<transliteration>) (<gloss>)`. `note` may be empty when the
/// word is identical to its base form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedWord {
    #[serde(default, alias = "arabic_text")]
    pub arabic: String,
    #[serde(default, alias = "english_translation")]
    pub translation: String,
    #[serde(default)]
    pub transliteration: String,
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub note: String,
}

impl TranslatedWord {
    /// Labelled grounding block used as the preamble of a follow-up question
    pub fn grounding_text(&self) -> String {
        format!(
            "Word:{}\nTranslation:{}\nTransliteration:{}\nBase:{}\nNote:{}",
            self.arabic, self.translation, self.transliteration, self.base, self.note
        )
    }
}

/// Full result of one translation call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Main dialect, `None` when the model omitted the tag
    pub dialect: Option<String>,
    /// Line-by-line translation in source order
    #[serde(rename = "ltranslation")]
    pub lines: Vec<TranslatedLine>,
    /// Word-by-word breakdown in model order
    #[serde(rename = "wtranslation")]
    pub words: Vec<TranslatedWord>,
    /// Tag-free narrative, injected as context into later questions
    #[serde(rename = "raw_output")]
    pub raw_narrative: String,
}

impl TranslationResult {
    /// True when the model produced nothing usable
    pub fn is_empty(&self) -> bool {
        self.dialect.is_none() && self.lines.is_empty() && self.words.is_empty()
    }
}
