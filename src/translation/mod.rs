/*!
 * Word and sentence translation for the reader.
 *
 * - `normalize`: turns selected text into a vocabulary key
 * - `cache`: in-memory sentence translation cache
 * - `service`: the vocabulary service orchestrating store, cache and
 *   translation backend
 */

// Re-export main types for easier usage
pub use self::cache::SentenceCache;
pub use self::normalize::{normalize_word, primary_language};
pub use self::service::{TranslateRequest, TranslationSource, VocabularyService, WordTranslation};

// Submodules
pub mod cache;
pub mod normalize;
pub mod service;
