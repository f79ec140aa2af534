/*!
 * Word segmentation for Chinese, Japanese and Korean.
 *
 * Chinese goes through jieba's dictionary segmenter. Japanese and Korean are
 * NFKC-normalized (half-width katakana and full-width digits fold to their
 * usual forms) and then split into runs of a single script: kanji, hiragana,
 * katakana, hangul, latin letters and digits. Every other symbol is a token
 * of its own. A hangul run is one eojeol, the unit Korean readers select.
 */

use jieba_rs::Jieba;
use std::fmt;
use unicode_normalization::UnicodeNormalization;

use crate::errors::ProviderError;
use crate::providers::Tokenizer;

/// Script class of one character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Han,
    Hiragana,
    Katakana,
    Hangul,
    Word,
    Space,
    /// Punctuation and symbols, never merged
    Symbol,
}

impl Script {
    fn of(ch: char) -> Self {
        match ch {
            '\u{3005}' | '\u{3007}' | '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' | '\u{F900}'..='\u{FAFF}' => {
                Script::Han
            }
            '\u{3041}'..='\u{309F}' => Script::Hiragana,
            // Prolonged sound mark belongs to katakana words
            '\u{30A1}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' => Script::Katakana,
            '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}' | '\u{AC00}'..='\u{D7AF}' => Script::Hangul,
            c if c.is_whitespace() => Script::Space,
            c if c.is_alphanumeric() => Script::Word,
            _ => Script::Symbol,
        }
    }
}

/// Split `text` into maximal runs of one script
fn script_runs(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_script: Option<Script> = None;

    for ch in text.chars() {
        let script = Script::of(ch);
        let joins = current_script == Some(script) && script != Script::Symbol;
        if !joins && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        current_script = Some(script);
        current.push(ch);
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Tokenizer for `zh`, `ja` and `ko`
pub struct CjkTokenizer {
    jieba: Jieba,
}

impl fmt::Debug for CjkTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CjkTokenizer").finish_non_exhaustive()
    }
}

impl Default for CjkTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CjkTokenizer {
    /// Load the bundled Chinese dictionary
    pub fn new() -> Self {
        Self { jieba: Jieba::new() }
    }
}

impl Tokenizer for CjkTokenizer {
    fn supports(&self, language: &str) -> bool {
        matches!(language, "zh" | "ja" | "ko")
    }

    fn tokenize(&self, text: &str, language: &str) -> Result<Vec<String>, ProviderError> {
        match language {
            "zh" => Ok(self
                .jieba
                .cut(text, true)
                .into_iter()
                .map(str::to_string)
                .collect()),
            "ja" | "ko" => Ok(script_runs(&text.nfkc().collect::<String>())),
            other => Err(ProviderError::Unavailable(format!(
                "no word segmentation for language '{}'",
                other
            ))),
        }
    }
}
