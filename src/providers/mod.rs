/*!
 * Collaborator interfaces and their implementations.
 *
 * The vocabulary core never talks to a cloud API directly. It goes through
 * the traits defined here:
 * - `Translator`: translate text, list supported languages
 * - `OcrEngine`: extract text from an image or the pages of a PDF
 * - `Tokenizer`: split CJK text into words
 *
 * Implementations:
 * - `google_translate`: Google Cloud Translation (v2 REST)
 * - `google_vision`: Google Cloud Vision (`images:annotate` and
 *   `files:annotate` REST)
 * - `cjk_tokenizer`: Chinese, Japanese and Korean word segmentation
 * - `mock`: in-process fakes for tests
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A language supported by the translation backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Language code (e.g. "es", "zh-TW")
    pub code: String,
    /// Display name
    pub name: String,
}

/// Text extracted from one image
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OcrResult {
    /// Full extracted text, lines separated by newlines
    pub full_text: String,
}

/// Machine translation backend
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate `text` from `source_language` into `target_language`
    ///
    /// The result may contain HTML entities; callers unescape it.
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// List the languages the backend can translate between
    async fn supported_languages(&self) -> Result<Vec<Language>, ProviderError>;
}

/// Optical character recognition backend
#[async_trait]
pub trait OcrEngine: Send + Sync + Debug {
    /// Extract text from encoded image bytes, using `language_hint` to bias
    /// recognition
    async fn extract_text(&self, image: &[u8], language_hint: &str) -> Result<OcrResult, ProviderError>;

    /// Extract the text of every page of a PDF document, in page order
    ///
    /// Engines that only read images keep this default.
    async fn extract_pages(
        &self,
        _document: &[u8],
        _language_hint: &str,
    ) -> Result<Vec<OcrResult>, ProviderError> {
        Err(ProviderError::Unavailable(
            "this OCR engine cannot read PDF documents".to_string(),
        ))
    }
}

/// Word segmentation for languages written without spaces
pub trait Tokenizer: Send + Sync + Debug {
    /// Whether this tokenizer handles `language` (a primary subtag)
    fn supports(&self, language: &str) -> bool;

    /// Split text into ordered tokens
    fn tokenize(&self, text: &str, language: &str) -> Result<Vec<String>, ProviderError>;
}

pub mod cjk_tokenizer;
pub mod google_translate;
pub mod google_vision;
pub mod mock;
