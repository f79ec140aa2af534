/*!
 * Mock collaborator implementations for testing.
 *
 * These fakes never touch the network and count every call, so tests can
 * assert how often the vocabulary core reached an external service:
 * - `MockTranslator::working()` - Always succeeds
 * - `MockTranslator::failing()` - Always fails with an API error
 * - `MockOcr` - Returns a fixed text (or fixed PDF pages) or fails
 * - `MockTokenizer` - Splits at whitespace boundaries for a configured set
 *   of languages
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{Language, OcrEngine, OcrResult, Tokenizer, Translator};

/// Behavior mode for the mock collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Always fails with an API error
    Failing,
}

/// Mock translator that records every request
#[derive(Debug, Clone)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of `translate` calls
    call_count: Arc<AtomicUsize>,
    /// Texts passed to `translate`, in order
    requests: Arc<Mutex<Vec<String>>>,
    /// Fixed answers keyed by input text
    dictionary: HashMap<String, String>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            dictionary: HashMap::new(),
        }
    }

    /// Create a working mock translator
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock translator that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Answer `text` with `translation` instead of the generated default
    pub fn with_translation(mut self, text: &str, translation: &str) -> Self {
        self.dictionary.insert(text.to_string(), translation.to_string());
        self
    }

    /// Number of translate calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Number of translate calls made for `text`
    pub fn calls_for(&self, text: &str) -> usize {
        self.requests.lock().iter().filter(|t| t.as_str() == text).count()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(text.to_string());

        match self.behavior {
            MockBehavior::Working => Ok(self
                .dictionary
                .get(text)
                .cloned()
                .unwrap_or_else(|| format!("[{}] {}", target_language, text))),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated translation failure".to_string(),
            }),
        }
    }

    async fn supported_languages(&self) -> Result<Vec<Language>, ProviderError> {
        match self.behavior {
            MockBehavior::Working => Ok(vec![
                Language { code: "en".to_string(), name: "English".to_string() },
                Language { code: "es".to_string(), name: "Spanish".to_string() },
                Language { code: "ja".to_string(), name: "Japanese".to_string() },
            ]),
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
        }
    }
}

/// Mock OCR engine returning a fixed text
#[derive(Debug, Clone)]
pub struct MockOcr {
    /// Behavior mode
    behavior: MockBehavior,
    /// Text returned for every image
    text: String,
    /// Page texts returned for every PDF
    pages: Vec<String>,
    /// Language hints received, in order
    hints: Arc<Mutex<Vec<String>>>,
}

impl MockOcr {
    /// Create a working OCR mock that reads `text` from every image
    pub fn returning(text: &str) -> Self {
        Self {
            behavior: MockBehavior::Working,
            text: text.to_string(),
            pages: Vec::new(),
            hints: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Read `pages` from every PDF, one text per page
    pub fn with_pages(mut self, pages: &[&str]) -> Self {
        self.pages = pages.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Create an OCR mock that always errors
    pub fn failing() -> Self {
        Self {
            behavior: MockBehavior::Failing,
            text: String::new(),
            pages: Vec::new(),
            hints: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Language hints passed so far
    pub fn hints(&self) -> Vec<String> {
        self.hints.lock().clone()
    }
}

#[async_trait]
impl OcrEngine for MockOcr {
    async fn extract_text(&self, _image: &[u8], language_hint: &str) -> Result<OcrResult, ProviderError> {
        self.hints.lock().push(language_hint.to_string());

        match self.behavior {
            MockBehavior::Working => Ok(OcrResult {
                full_text: self.text.clone(),
            }),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 3,
                message: "Bad image data.".to_string(),
            }),
        }
    }

    async fn extract_pages(&self, _document: &[u8], language_hint: &str) -> Result<Vec<OcrResult>, ProviderError> {
        self.hints.lock().push(language_hint.to_string());

        match self.behavior {
            MockBehavior::Working => Ok(self
                .pages
                .iter()
                .map(|page| OcrResult {
                    full_text: page.clone(),
                })
                .collect()),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 3,
                message: "Bad PDF data.".to_string(),
            }),
        }
    }
}

/// Mock tokenizer splitting on whitespace
#[derive(Debug, Clone)]
pub struct MockTokenizer {
    /// Behavior mode
    behavior: MockBehavior,
    /// Languages reported as supported
    languages: Vec<String>,
}

impl MockTokenizer {
    /// Create a working tokenizer for the given languages
    pub fn for_languages(languages: &[&str]) -> Self {
        Self {
            behavior: MockBehavior::Working,
            languages: languages.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Create a tokenizer that claims support but always errors
    pub fn failing(languages: &[&str]) -> Self {
        Self {
            behavior: MockBehavior::Failing,
            ..Self::for_languages(languages)
        }
    }
}

impl Tokenizer for MockTokenizer {
    fn supports(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }

    fn tokenize(&self, text: &str, _language: &str) -> Result<Vec<String>, ProviderError> {
        match self.behavior {
            MockBehavior::Working => {
                // Whitespace runs come back as tokens of their own
                let mut tokens = Vec::new();
                let mut current = String::new();
                let mut in_space: Option<bool> = None;
                for ch in text.chars() {
                    let is_space = ch.is_whitespace();
                    if in_space.is_some_and(|s| s != is_space) {
                        tokens.push(std::mem::take(&mut current));
                    }
                    in_space = Some(is_space);
                    current.push(ch);
                }
                if !current.is_empty() {
                    tokens.push(current);
                }
                Ok(tokens)
            }
            MockBehavior::Failing => Err(ProviderError::Unavailable(
                "Simulated tokenizer failure".to_string(),
            )),
        }
    }
}
