/*!
 * Document processing: OCR an uploaded image or PDF and prepare its text for
 * reading.
 *
 * An image becomes a single page carrying the image itself. A PDF becomes one
 * page per PDF page, text only.
 *
 * Text in Chinese, Japanese or Korean is split into words by the configured
 * `Tokenizer` so the reader can select single words. Without a tokenizer, or
 * for any other language, the page is returned as plain text.
 */

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::errors::{VocabularyError, VocabularyResult};
use crate::providers::{OcrEngine, Tokenizer};
use crate::translation::primary_language;

/// Source locale assumed when the request names none
pub const DEFAULT_SOURCE_LOCALE: &str = "en-US";

/// Languages that are tokenized before being returned
pub const TOKENIZED_LANGUAGES: [&str; 3] = ["zh", "ja", "ko"];

/// Text of one page, either split into words or as is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextData {
    /// Ordered non-blank tokens
    Tokenized { tokens: Vec<String> },
    /// Untokenized text
    Plain { text: String },
}

/// One processed page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedPage {
    /// Full OCR text
    pub full_text: String,
    /// Text prepared for display
    pub text_data: TextData,
    /// The page image, base64 encoded; absent for PDF pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_b64: Option<String>,
}

/// Result of processing an uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    /// Pages in order
    pub pages: Vec<ProcessedPage>,
}

/// OCR + tokenization pipeline for uploaded images and PDFs
#[derive(Clone)]
pub struct DocumentProcessor {
    ocr: Arc<dyn OcrEngine>,
    tokenizer: Option<Arc<dyn Tokenizer>>,
}

impl DocumentProcessor {
    /// Create a processor that returns plain text only
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self {
            ocr,
            tokenizer: None,
        }
    }

    /// Use `tokenizer` for the CJK languages it supports
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// OCR `bytes` (the contents of `file_name`) and prepare its text
    pub async fn process(
        &self,
        bytes: &[u8],
        file_name: &str,
        source_language: Option<&str>,
    ) -> VocabularyResult<ProcessedDocument> {
        if bytes.is_empty() {
            return Err(VocabularyError::InvalidInput("no file was received".to_string()));
        }

        let locale = source_language
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(DEFAULT_SOURCE_LOCALE);
        let language = primary_language(locale);
        debug!("Processing '{}' ({} bytes, language {})", file_name, bytes.len(), language);

        if is_pdf(bytes, file_name) {
            let pages = self.ocr.extract_pages(bytes, language).await?;
            if pages.is_empty() {
                return Err(VocabularyError::InvalidInput(
                    "the PDF document has no pages".to_string(),
                ));
            }
            debug!("Read {} PDF pages from '{}'", pages.len(), file_name);

            return Ok(ProcessedDocument {
                pages: pages
                    .into_iter()
                    .map(|page| ProcessedPage {
                        text_data: self.prepare_text(&page.full_text, language),
                        full_text: page.full_text,
                        image_b64: None,
                    })
                    .collect(),
            });
        }

        let ocr = self.ocr.extract_text(bytes, language).await?;
        let text_data = self.prepare_text(&ocr.full_text, language);

        Ok(ProcessedDocument {
            pages: vec![ProcessedPage {
                full_text: ocr.full_text,
                text_data,
                image_b64: Some(STANDARD.encode(bytes)),
            }],
        })
    }

    fn prepare_text(&self, text: &str, language: &str) -> TextData {
        let tokenizer = match &self.tokenizer {
            Some(t) if TOKENIZED_LANGUAGES.contains(&language) && t.supports(language) => t,
            _ => {
                return TextData::Plain {
                    text: text.to_string(),
                };
            }
        };

        match tokenizer.tokenize(text, language) {
            Ok(tokens) => TextData::Tokenized {
                tokens: tokens
                    .into_iter()
                    .filter(|token| !token.trim().is_empty())
                    .collect(),
            },
            Err(e) => {
                warn!("Tokenizer failed for {}, returning plain text: {}", language, e);
                TextData::Plain {
                    text: text.to_string(),
                }
            }
        }
    }
}

fn is_pdf(bytes: &[u8], file_name: &str) -> bool {
    let by_extension = Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    by_extension || bytes.starts_with(b"%PDF")
}
