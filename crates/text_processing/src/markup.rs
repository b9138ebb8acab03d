//! Tagged-response parsing
//!
//! The model answers a translation request with a tag-delimited fragment:
//!
//! ```text
//! <dialect>Levantine</dialect>
//! <ltranslation>
//!   <line><arabic>..</arabic><transliteration>..</transliteration><translation>..</translation></line>
//! </ltranslation>
//! <wtranslation>
//!   <word><arabic>..</arabic><translation>..</translation><transliteration>..</transliteration><base>..</base><note>..</note></word>
//! </wtranslation>
//! ```
//!
//! The fragment has no single root and any section or field may be missing.
//! It is wrapped in a synthetic root, read into a small element tree with
//! `quick-xml`, and every field is extracted independently with an empty
//! default. Markup that cannot be read at all is a [`ParseError`].

use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use lyric_tutor_core::{TranslatedLine, TranslatedWord, TranslationResult};

use crate::error::ParseError;

/// Name of the synthetic wrapper element
const FRAGMENT_ROOT: &str = "root";

/// Decorative separators the model emits between sections
static SEPARATOR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{3,}").expect("separator pattern"));

/// Blank-line runs in the narrative
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("blank line pattern"));

/// Remove runs of three or more dashes
pub fn strip_separators(text: &str) -> String {
    SEPARATOR_RUN.replace_all(text, "").into_owned()
}

#[derive(Debug, Clone)]
enum Node {
    Element(Element),
    Text(String),
}

/// Minimal element tree; attributes are not needed by the grammar
#[derive(Debug, Clone, Default)]
struct Element {
    name: String,
    children: Vec<Node>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
        }
    }

    /// First direct child with the given name
    fn find<'a>(&'a self, name: &'a str) -> Option<&'a Element> {
        self.find_all(name).next()
    }

    /// Direct children with the given name, in document order
    fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter_map(move |child| match child {
            Node::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    /// All descendant text in document order
    fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) => el.collect_text(out),
            }
        }
    }

    /// Trimmed text of the first child named `name`, empty when absent
    fn field(&self, name: &str) -> String {
        self.find(name)
            .map(|el| el.text().trim().to_string())
            .unwrap_or_default()
    }
}

/// Read a rootless fragment into a tree under the synthetic root
fn parse_fragment(fragment: &str) -> Result<Element, ParseError> {
    let wrapped = format!("<{FRAGMENT_ROOT}>{fragment}</{FRAGMENT_ROOT}>");
    let mut reader = Reader::from_str(&wrapped);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = true;

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| ParseError::Malformed {
            position: reader.error_position(),
            reason: e.to_string(),
        })?;

        match event {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(ParseError::TrailingContent);
                }
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                stack.push(Element::new(name));
            },
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(Element::new(name))),
                    None => return Err(ParseError::TrailingContent),
                }
            },
            Event::End(_) => {
                let closed = stack.pop().ok_or(ParseError::TrailingContent)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(closed)),
                    None => root = Some(closed),
                }
            },
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| ParseError::Malformed {
                    position: reader.buffer_position(),
                    reason: e.to_string(),
                })?;
                push_text(&mut stack, &text)?;
            },
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                push_text(&mut stack, &text)?;
            },
            Event::Eof => break,
            // Comments, declarations, processing instructions
            _ => {},
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::Unclosed(open.name));
    }

    root.ok_or_else(|| ParseError::Unclosed(FRAGMENT_ROOT.to_string()))
}

fn push_text(stack: &mut [Element], text: &str) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(el) => {
            el.children.push(Node::Text(text.to_string()));
            Ok(())
        },
        None if text.trim().is_empty() => Ok(()),
        None => Err(ParseError::TrailingContent),
    }
}

/// Tolerant extractor for the model's tagged translation block
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse model output into a translation record.
    ///
    /// Separator runs are stripped first. Missing sections and fields yield
    /// empty values; only unreadable markup is an error. When several tags of
    /// the same kind compete, the first one wins.
    pub fn parse(&self, output: &str) -> Result<TranslationResult, ParseError> {
        let cleaned = strip_separators(output);
        let root = parse_fragment(&cleaned)?;

        let dialect = root
            .find("dialect")
            .map(|el| el.text().trim().to_string())
            .filter(|d| !d.is_empty());

        let lines: Vec<TranslatedLine> = root
            .find("ltranslation")
            .map(|section| {
                section
                    .find_all("line")
                    .map(|line| TranslatedLine {
                        arabic: line.field("arabic"),
                        transliteration: line.field("transliteration"),
                        translation: line.field("translation"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let words: Vec<TranslatedWord> = root
            .find("wtranslation")
            .map(|section| {
                section
                    .find_all("word")
                    .map(|word| TranslatedWord {
                        arabic: word.field("arabic"),
                        translation: word.field("translation"),
                        transliteration: word.field("transliteration"),
                        base: word.field("base"),
                        note: word.field("note"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let raw_narrative = narrative(&root);

        tracing::debug!(
            dialect = dialect.as_deref().unwrap_or("<none>"),
            lines = lines.len(),
            words = words.len(),
            "Parsed translation block"
        );

        Ok(TranslationResult {
            dialect,
            lines,
            words,
            raw_narrative,
        })
    }
}

/// Tag-free rendering of a parsed fragment
fn narrative(root: &Element) -> String {
    let text = root.text();
    BLANK_LINES.replace_all(&text, "\n\n").trim().to_string()
}

/// Strip every tag from a model output, keeping only text content.
///
/// Runs of blank lines collapse to a single blank line.
pub fn strip_tags(output: &str) -> Result<String, ParseError> {
    let root = parse_fragment(&strip_separators(output))?;
    Ok(narrative(&root))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<dialect>Levantine</dialect>

<ltranslation>
<line>
<arabic>"ليه متضايقة ليه"</arabic>
<transliteration>Leh mitdayiqah leh?</transliteration>
<translation>Why are you upset? Why?</translation>
</line>

<line>
<arabic>"عيونها بلو"</arabic>
<transliteration>Uyoonha bloo</transliteration>
<translation>Her eyes are blue</translation>
</line>
</ltranslation>

<wtranslation>
<word>
<arabic>"احب"</arabic>
<translation>I love</translation>
<transliteration>Ahibb</transliteration>
<base>"حب" (hubb) (love)</base>
<note>We add "ا" (a) as the prefix to say "I love".</note>
</word>

<word>
<arabic>"شاي"</arabic>
<translation>tea</translation>
<transliteration>shayy</transliteration>
<base>"شاي" (shayy) (tea)</base>
</word>
</wtranslation>"#;

    fn parse(text: &str) -> Result<TranslationResult, ParseError> {
        ResponseParser::new().parse(text)
    }

    #[test]
    fn test_full_block() {
        let result = parse(SAMPLE).unwrap();
        assert_eq!(result.dialect.as_deref(), Some("Levantine"));
        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.words.len(), 2);

        assert_eq!(result.lines[1].arabic, "\"عيونها بلو\"");
        assert_eq!(result.lines[1].transliteration, "Uyoonha bloo");
        assert_eq!(result.lines[1].translation, "Her eyes are blue");

        assert_eq!(result.words[0].base, "\"حب\" (hubb) (love)");
        assert_eq!(result.words[0].note, "We add \"ا\" (a) as the prefix to say \"I love\".");
        assert!(result.words[1].note.is_empty());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let result = parse(
            "<dialect>Levantine</dialect><ltranslation><line><arabic>ليه</arabic></line></ltranslation>",
        )
        .unwrap();
        assert_eq!(result.dialect.as_deref(), Some("Levantine"));
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].arabic, "ليه");
        assert_eq!(result.lines[0].transliteration, "");
        assert_eq!(result.lines[0].translation, "");
        assert!(result.words.is_empty());
    }

    #[test]
    fn test_empty_output_is_valid() {
        let result = parse("").unwrap();
        assert!(result.is_empty());
        assert_eq!(result.raw_narrative, "");

        let result = parse("Sorry, I cannot translate this.").unwrap();
        assert!(result.is_empty());
        assert_eq!(result.raw_narrative, "Sorry, I cannot translate this.");
    }

    #[test]
    fn test_missing_or_blank_dialect() {
        let result = parse("<ltranslation></ltranslation>").unwrap();
        assert!(result.dialect.is_none());

        let result = parse("<dialect>   </dialect>").unwrap();
        assert!(result.dialect.is_none());
    }

    #[test]
    fn test_first_dialect_wins() {
        let result = parse("<dialect> Egyptian </dialect><dialect>Gulf</dialect>").unwrap();
        assert_eq!(result.dialect.as_deref(), Some("Egyptian"));
    }

    #[test]
    fn test_unclosed_tag_is_an_error() {
        // Second <translation> opens instead of closing
        let broken = "<ltranslation><line><translation>Why?<translation></line></ltranslation>";
        assert!(parse(broken).is_err());

        assert!(parse("<dialect>Levantine").is_err());
        assert!(parse("Levantine</dialect>").is_err());
    }

    #[test]
    fn test_field_lookup_with_owned_name() {
        let root = parse_fragment("<word><base>قلب</base><note>n</note></word>").unwrap();
        let word = root.find("word").unwrap();
        for (name, expected) in [("base", "قلب"), ("note", "n"), ("missing", "")] {
            let owned = name.to_string();
            assert_eq!(word.field(&owned), expected);
            assert_eq!(word.find_all(&owned).count(), usize::from(!expected.is_empty()));
        }
    }

    #[test]
    fn test_separator_lines_are_ignored() {
        let with_rule = SAMPLE.replace("</ltranslation>\n", "</ltranslation>\n---------\n");
        assert_ne!(with_rule, SAMPLE);
        assert_eq!(parse(&with_rule).unwrap(), parse(SAMPLE).unwrap());
    }

    #[test]
    fn test_short_dashes_are_content() {
        let result = parse(
            "<ltranslation><line><transliteration>id-dunya -- x</transliteration></line></ltranslation>",
        )
        .unwrap();
        assert_eq!(result.lines[0].transliteration, "id-dunya -- x");
    }

    #[test]
    fn test_lines_outside_section_are_ignored() {
        let result = parse(
            "<line><arabic>stray</arabic></line>\
             <wtranslation><word><arabic>و</arabic></word></wtranslation>",
        )
        .unwrap();
        assert!(result.lines.is_empty());
        assert_eq!(result.words.len(), 1);
        assert_eq!(result.words[0].arabic, "و");
        assert_eq!(result.words[0].translation, "");
    }

    #[test]
    fn test_narrative_collapses_blank_lines() {
        let narrative = strip_tags(
            "<dialect>X</dialect>\n\n\n\n<ltranslation><line><arabic>Y</arabic></line></ltranslation>",
        )
        .unwrap();
        assert_eq!(narrative, "X\n\nY");
    }

    #[test]
    fn test_narrative_matches_parse() {
        let result = parse(SAMPLE).unwrap();
        assert_eq!(result.raw_narrative, strip_tags(SAMPLE).unwrap());
        assert!(result.raw_narrative.starts_with("Levantine\n\n\"ليه متضايقة ليه\""));
        assert!(!result.raw_narrative.contains('<'));
        assert!(!result.raw_narrative.contains("\n\n\n"));
    }

    #[test]
    fn test_entities_are_decoded() {
        let output = "<wtranslation><word><note>tea &amp; coffee</note></word></wtranslation>";
        let result = parse(output).unwrap();
        assert_eq!(result.words[0].note, "tea & coffee");
    }

    #[test]
    fn test_self_closing_field() {
        let result =
            parse("<wtranslation><word><arabic>و</arabic><note/></word></wtranslation>").unwrap();
        assert_eq!(result.words[0].note, "");
    }

    #[test]
    fn test_strip_separators() {
        assert_eq!(strip_separators("a---b"), "ab");
        assert_eq!(strip_separators("a\n----------\nb"), "a\n\nb");
        assert_eq!(strip_separators("a--b"), "a--b");
    }
}
