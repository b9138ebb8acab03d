//! Prompt construction
//!
//! Builds the exact requests sent to the model for a translation and for a
//! follow-up question. Both are pure data assembly.

use lyric_tutor_core::{ContinuationId, TranslatedWord};

use crate::backend::GenerateRequest;

/// Fixed translation instructions, including the tagged output grammar and
/// a worked sample.
pub const TRANSLATION_INSTRUCTIONS: &str = r#"Your job is to translate the lyrics of Arabic songs into English for language learning purposes. You should be culturally relevant and beginner-friendly.

First, recognize the main dialect. Then provide a line-by-line translation of the song and a word-by-word translation, considering the dialect. The word-by-word translation should also include a breakdown of the word, highlighting its basic usage form, that is, how it appears without gender/pronoun/verb/etc. additions. You should also provide transliteration to clarify how the words are pronounced. Always provide the transliteration next to Arabic words, as the user may not know how to read them.

The lyrics may contain English words in Latin script; do NOT add a section for these words in the word-by-word translation section, SKIP them completely. An English word may also be written in Arabic script; in this case, include the word in the word-by-word translation section and consider the English meaning for translation. For code-switched lyrics, the words may appear out of order due to RTL and LTR; hence, consider how the words fit together when translating.

Please follow the format given below strictly to structure your response. Don't add any additional information other than the one specified.

Format:
<dialect>Mention the main dialect only.</dialect>

<ltranslation>
<line>
<arabic>"The original lyric in Arabic"</arabic>
<transliteration>Transliteration of lyric line</transliteration>
<translation>Equivalent translation of the line in English</translation>
</line>
</ltranslation>

<wtranslation>
<word>
<arabic>"Arabic text of the word"</arabic>
<translation>Translation in English only with no explanation</translation>
<transliteration>Transliteration of the word</transliteration>
<base>"Arabic text of the base word" (Transliteration of the base word) (Meaning of the base word)</base>
<note>Clearly explain how the suffix/prefix/verb tense/etc. are combined to give the final word. Consider how neighboring words affect the meaning/form of the current word, for example: the current word has a feminine suffix because it describes the next word, which is feminine. You can skip this if a word is the same as the base. You may add contextual/cultural information here. Do not mention complex grammatical terminology.</note>
</word>
</wtranslation>

Here is a sample response:
<dialect>Levantine</dialect>

<ltranslation>
<line>
<arabic>"ليه متضايقة ليه"</arabic>
<transliteration>Leh mitdayiqah leh?</transliteration>
<translation>Why are you upset? Why?</translation>
</line>

<line>
<arabic>"coffee hot احب شاي و"</arabic>
<transliteration>Ahibb shayy wa hot coffee</transliteration>
<translation>I love tea and hot coffee</translation>
</line>

<line>
<arabic>"عيونها بلو"</arabic>
<transliteration>Uyoonha bloo</transliteration>
<translation>Her eyes are blue</translation>
</line>

...
</ltranslation>

<wtranslation>
<word>
<arabic>"ليه"</arabic>
<translation>why</translation>
<transliteration>leh</transliteration>
<base>"ليه" (leh) (why)</base>
<note>"ليه" (leh) is commonly used in Egyptian and Levantine Arabic. It's the informal, everyday version of the more formal "لماذا" (limadha).</note>
</word>

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

<word>
<arabic>"و"</arabic>
<translation>and</translation>
<transliteration>wa</transliteration>
<base>"و" (wa) (and)</base>
</word>

<word>
<arabic>"بلو"</arabic>
<translation>blue</translation>
<transliteration>bloo</transliteration>
<base>"بلو" (bloo) (blue)</base>
<note>This is the English word "blue" written in Arabic script.</note>
</word>

<word>
<arabic>"بتمشي"</arabic>
<translation>walks</translation>
<transliteration>btimshi</transliteration>
<base>"مشى" (masha) (walked)</base>
<note>"بتمشي" (btimshi) is a verb with two prefixes: b- (for the present tense) and t- (showing it's feminine) to match the next word "الدنيا" (id-dunya), which is a feminine noun meaning "the world".</note>
</word>

...
</wtranslation>
"#;

/// Sentence the model must answer with for off-topic questions
pub const QA_REFUSAL: &str = "Sorry, I can't answer a question that's not about lyrics.";

/// Default output cap for follow-up answers
pub const DEFAULT_QA_MAX_OUTPUT_TOKENS: u32 = 500;

const QA_PREAMBLE: &str = "Your job is to answer the user's queries regarding a song's translation. You should be culturally relevant and beginner-friendly.

Do not try to guess or interpret the name of the song, just answer the question about the given lyrics. Remember that an English word may be written in Arabic script; in this case, you should consider the English meaning of the word. For code-switched lyrics, the words may appear out of order due to RTL and LTR; hence, consider how the words fit together. Always provide the transliteration when referring to Arabic words, as the user may not know how to read them.";

/// Builds the request for a translation call
#[derive(Debug, Clone, Copy, Default)]
pub struct TranslationRequestBuilder;

impl TranslationRequestBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Request for already-deduplicated lyrics.
    ///
    /// Temperature 0 and not persisted: translation calls never start a
    /// thread that could be continued.
    pub fn build(&self, lyrics: &str) -> GenerateRequest {
        GenerateRequest::new(TRANSLATION_INSTRUCTIONS, lyrics)
    }
}

/// Builds the request for one follow-up question
#[derive(Debug, Clone)]
pub struct QuestionRequestBuilder {
    max_output_tokens: u32,
}

impl Default for QuestionRequestBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_QA_MAX_OUTPUT_TOKENS)
    }
}

impl QuestionRequestBuilder {
    pub fn new(max_output_tokens: u32) -> Self {
        Self { max_output_tokens }
    }

    /// Per-call instructions grounded in the song's translation narrative
    pub fn instructions(&self, narrative: &str) -> String {
        format!(
            "{QA_PREAMBLE}\n\nIf the user's query is not relevant to your job, do not answer it, instead say \"{QA_REFUSAL}\".\n\nBelow are the translated lyrics:\n{narrative}\n\n"
        )
    }

    /// Word grounding followed by the user's question
    pub fn user_input(&self, word: &TranslatedWord, query: &str) -> String {
        format!("{}\n\n{}", word.grounding_text(), query)
    }

    /// Request that continues `continuation` when present and is persisted so
    /// the next question can continue it in turn
    pub fn build(
        &self,
        word: &TranslatedWord,
        narrative: &str,
        query: &str,
        continuation: Option<ContinuationId>,
    ) -> GenerateRequest {
        GenerateRequest::new(self.instructions(narrative), self.user_input(word, query))
            .with_max_output_tokens(self.max_output_tokens)
            .continuing(continuation)
            .persisted(true)
    }
}
