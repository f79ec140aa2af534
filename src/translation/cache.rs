/*!
 * Sentence translation caching.
 *
 * Keeps translated sentences in memory for the lifetime of the process so
 * that looking up several words of the same sentence only translates the
 * sentence once. The cache has no size bound and no eviction; it lives as
 * long as the `VocabularyService` that owns it.
 */

use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Cache key combining sentence text, source language, and target language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Sentence as it was submitted
    sentence: String,

    /// Source language code
    source_language: String,

    /// Target language code
    target_language: String,
}

impl CacheKey {
    fn new(sentence: &str, source_language: &str, target_language: &str) -> Self {
        Self {
            sentence: sentence.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        }
    }
}

/// In-memory cache of sentence translations
///
/// Clones share the same storage.
#[derive(Clone)]
pub struct SentenceCache {
    /// Internal cache storage
    entries: Arc<RwLock<HashMap<CacheKey, String>>>,

    /// Cache hit counter
    hits: Arc<AtomicUsize>,

    /// Cache miss counter
    misses: Arc<AtomicUsize>,

    /// Whether caching is enabled
    enabled: bool,
}

impl SentenceCache {
    /// Create a new sentence cache
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(AtomicUsize::new(0)),
            misses: Arc::new(AtomicUsize::new(0)),
            enabled,
        }
    }

    /// Get a sentence translation from the cache
    pub fn get(&self, sentence: &str, source_language: &str, target_language: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::new(sentence, source_language, target_language);
        let found = self.entries.read().get(&key).cloned();

        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(
                "Sentence cache hit for '{}' ({} -> {})",
                truncate_text(sentence, 30),
                source_language,
                target_language
            );
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(
                "Sentence cache miss for '{}' ({} -> {})",
                truncate_text(sentence, 30),
                source_language,
                target_language
            );
        }

        found
    }

    /// Store a sentence translation in the cache
    ///
    /// A second put for the same key replaces the first.
    pub fn put(&self, sentence: &str, source_language: &str, target_language: &str, translated: &str) {
        if !self.enabled {
            return;
        }

        let key = CacheKey::new(sentence, source_language, target_language);
        self.entries.write().insert(key, translated.to_string());
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for SentenceCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
