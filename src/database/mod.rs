/*!
 * Database module for persistent storage of the learner's vocabulary.
 *
 * This module provides SQLite-based persistence for:
 * - Known words with their translation, keyed by (word, source, target)
 * - Per-word learning status ("new", "learning", "known", ...)
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{LanguagePair, LearningStatus, VocabularyFilter, VocabularyRecord, WordLookup};
pub use repository::{Repository, VocabularyStats};
