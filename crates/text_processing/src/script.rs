//! Script detection
//!
//! Used as an admission gate: lyrics without any Arabic-script character are
//! rejected before a model call is made.

use std::ops::RangeInclusive;

/// Arabic Unicode block
pub const ARABIC_BLOCK: RangeInclusive<char> = '\u{0600}'..='\u{06FF}';

/// True iff at least one character falls in the Arabic block (U+0600-U+06FF)
pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(|c| ARABIC_BLOCK.contains(&c))
}

/// Count of Arabic-block characters, for logging code-switched input
pub fn arabic_char_count(text: &str) -> usize {
    text.chars().filter(|c| ARABIC_BLOCK.contains(c)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_only() {
        assert!(!contains_arabic("hello"));
        assert!(!contains_arabic(""));
        assert!(!contains_arabic("hot coffee 123 !?"));
    }

    #[test]
    fn test_mixed_script() {
        assert!(contains_arabic("hello مرحبا"));
        assert!(contains_arabic("coffee hot احب شاي و"));
    }

    #[test]
    fn test_block_edges() {
        assert!(contains_arabic("\u{0600}"));
        assert!(contains_arabic("\u{06FF}"));
        assert!(!contains_arabic("\u{05FF}"));
        // Arabic Supplement and presentation forms are outside the gate
        assert!(!contains_arabic("\u{0750}"));
        assert!(!contains_arabic("\u{FE8D}"));
    }

    #[test]
    fn test_other_scripts() {
        assert!(!contains_arabic("שלום"));
        assert!(!contains_arabic("नमस्ते"));
    }

    #[test]
    fn test_count() {
        assert_eq!(arabic_char_count("hi ليه"), 3);
        assert_eq!(arabic_char_count("hi"), 0);
    }
}
