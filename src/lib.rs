/*!
 * # Lector - reading and vocabulary companion
 *
 * A Rust library for reading foreign-language documents and building a
 * personal vocabulary while doing so.
 *
 * ## Features
 *
 * - OCR page images and PDFs through Google Cloud Vision
 * - Split Chinese, Japanese and Korean text into words (pluggable tokenizer)
 * - Translate selected words and sentences through Google Cloud Translation
 * - Persist every looked-up word with its translation and learning status
 *   in a local SQLite database
 * - Remember sentence translations for the running session
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: Vocabulary store (schema, connection, repository)
 * - `translation`: Word normalization, sentence cache, vocabulary service
 * - `document`: OCR and tokenization of uploaded pages
 * - `providers`: Collaborator traits and the Google / mock implementations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod database;
pub mod document;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::{LearningStatus, Repository, VocabularyFilter, VocabularyRecord};
pub use document::{DocumentProcessor, ProcessedDocument, TextData};
pub use errors::{ErrorKind, ProviderError, VocabularyError};
pub use translation::{SentenceCache, TranslateRequest, VocabularyService, WordTranslation};
