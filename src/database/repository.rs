/*!
 * Repository layer for vocabulary operations.
 *
 * This module provides a high-level API for all vocabulary storage,
 * abstracting away the SQL details and providing type-safe access.
 * Words are expected to arrive already normalized; the repository stores
 * and matches them verbatim.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{params, params_from_iter, OptionalExtension};
use std::collections::HashMap;

use super::connection::DatabaseConnection;
use super::models::{LearningStatus, VocabularyFilter, VocabularyRecord, WordLookup};

/// Maximum bound parameters per `IN (...)` query
const LOOKUP_CHUNK_SIZE: usize = 500;

/// Repository for vocabulary operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Ensure the vocabulary table exists
    ///
    /// The connection already does this when it is opened; calling it again
    /// is a no-op.
    pub async fn initialize(&self) -> Result<()> {
        self.db
            .execute_async(|conn| super::schema::initialize_schema(conn))
            .await
    }

    // =========================================================================
    // Single-word Operations
    // =========================================================================

    /// Store a word with status "new" unless the identity already exists
    ///
    /// Returns whether a row was inserted. An existing row keeps its
    /// translation and status.
    pub async fn save(
        &self,
        word: &str,
        source_language: &str,
        target_language: &str,
        translation: &str,
    ) -> Result<bool> {
        let word = word.to_string();
        let source_language = source_language.to_string();
        let target_language = target_language.to_string();
        let translation = translation.to_string();

        self.db
            .execute_async(move |conn| {
                let inserted = conn.execute(
                    r#"
                    INSERT INTO vocabulary (
                        word_text, source_language, target_language, translation, learning_status
                    ) VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(word_text, source_language, target_language) DO NOTHING
                    "#,
                    params![
                        word,
                        source_language,
                        target_language,
                        translation,
                        LearningStatus::New.as_str(),
                    ],
                )?;

                if inserted == 0 {
                    debug!("'{}' ({} -> {}) already stored", word, source_language, target_language);
                }
                Ok(inserted > 0)
            })
            .await
    }

    /// Look up a word by its exact identity
    pub async fn lookup(
        &self,
        word: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Option<WordLookup>> {
        let word = word.to_string();
        let source_language = source_language.to_string();
        let target_language = target_language.to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT translation, learning_status
                        FROM vocabulary
                        WHERE word_text = ?1 AND source_language = ?2 AND target_language = ?3
                        "#,
                        params![word, source_language, target_language],
                        |row| {
                            Ok(WordLookup {
                                translation: row.get(0)?,
                                status: LearningStatus::from(row.get::<_, String>(1)?),
                            })
                        },
                    )
                    .optional()?;

                Ok(result)
            })
            .await
    }

    /// Overwrite the learning status of a word
    ///
    /// Any label is accepted. Returns whether a row matched.
    pub async fn update_status(
        &self,
        word: &str,
        source_language: &str,
        target_language: &str,
        status: &LearningStatus,
    ) -> Result<bool> {
        let word = word.to_string();
        let source_language = source_language.to_string();
        let target_language = target_language.to_string();
        let status = status.to_string();

        self.db
            .execute_async(move |conn| {
                let updated = conn.execute(
                    r#"
                    UPDATE vocabulary SET learning_status = ?1
                    WHERE word_text = ?2 AND source_language = ?3 AND target_language = ?4
                    "#,
                    params![status, word, source_language, target_language],
                )?;
                Ok(updated > 0)
            })
            .await
    }

    /// Overwrite the translation text of a word, leaving its status alone
    pub async fn edit_translation(
        &self,
        word: &str,
        source_language: &str,
        target_language: &str,
        new_translation: &str,
    ) -> Result<bool> {
        let word = word.to_string();
        let source_language = source_language.to_string();
        let target_language = target_language.to_string();
        let new_translation = new_translation.to_string();

        self.db
            .execute_async(move |conn| {
                let updated = conn.execute(
                    r#"
                    UPDATE vocabulary SET translation = ?1
                    WHERE word_text = ?2 AND source_language = ?3 AND target_language = ?4
                    "#,
                    params![new_translation, word, source_language, target_language],
                )?;
                Ok(updated > 0)
            })
            .await
    }

    /// Delete a word. Returns whether a row was removed.
    pub async fn delete(
        &self,
        word: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<bool> {
        let word = word.to_string();
        let source_language = source_language.to_string();
        let target_language = target_language.to_string();

        self.db
            .execute_async(move |conn| {
                let deleted = conn.execute(
                    r#"
                    DELETE FROM vocabulary
                    WHERE word_text = ?1 AND source_language = ?2 AND target_language = ?3
                    "#,
                    params![word, source_language, target_language],
                )?;
                Ok(deleted > 0)
            })
            .await
    }

    // =========================================================================
    // Bulk Operations
    // =========================================================================

    /// Get the status of every known word among `words`
    ///
    /// Unknown words are absent from the result. Empty input returns an
    /// empty map without touching the database.
    pub async fn bulk_lookup_status(
        &self,
        words: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<HashMap<String, LearningStatus>> {
        if words.is_empty() {
            return Ok(HashMap::new());
        }

        let mut words = words.to_vec();
        words.sort();
        words.dedup();
        let source_language = source_language.to_string();
        let target_language = target_language.to_string();

        self.db
            .execute_async(move |conn| {
                let mut statuses = HashMap::new();

                for chunk in words.chunks(LOOKUP_CHUNK_SIZE) {
                    let placeholders = (0..chunk.len())
                        .map(|i| format!("?{}", i + 3))
                        .collect::<Vec<_>>()
                        .join(",");
                    let query = format!(
                        r#"
                        SELECT word_text, learning_status
                        FROM vocabulary
                        WHERE source_language = ?1 AND target_language = ?2
                          AND word_text IN ({})
                        "#,
                        placeholders
                    );

                    let bound = [source_language.as_str(), target_language.as_str()]
                        .into_iter()
                        .chain(chunk.iter().map(String::as_str));

                    let mut stmt = conn.prepare(&query)?;
                    let rows = stmt.query_map(params_from_iter(bound), |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                    })?;

                    for row in rows {
                        let (word, status) = row?;
                        statuses.insert(word, LearningStatus::from(status));
                    }
                }

                Ok(statuses)
            })
            .await
    }

    /// List vocabulary entries in insertion order
    pub async fn list(&self, filter: &VocabularyFilter) -> Result<Vec<VocabularyRecord>> {
        let filter = filter.clone();

        self.db
            .execute_async(move |conn| {
                let mut conditions: Vec<String> = Vec::new();
                let mut bound: Vec<String> = Vec::new();

                if let Some(status) = &filter.status {
                    bound.push(status.to_string());
                    conditions.push(format!("learning_status = ?{}", bound.len()));
                }

                if let Some(pair) = &filter.language_pair {
                    bound.push(pair.source.clone());
                    conditions.push(format!("source_language = ?{}", bound.len()));
                    bound.push(pair.target.clone());
                    conditions.push(format!("target_language = ?{}", bound.len()));
                }

                let mut query = String::from(
                    "SELECT word_text, source_language, target_language, translation, learning_status FROM vocabulary",
                );
                if !conditions.is_empty() {
                    query.push_str(" WHERE ");
                    query.push_str(&conditions.join(" AND "));
                }
                query.push_str(" ORDER BY id");

                let mut stmt = conn.prepare(&query)?;
                let rows = stmt.query_map(params_from_iter(bound.iter()), |row| {
                    Ok(VocabularyRecord {
                        word_text: row.get(0)?,
                        source_language: row.get(1)?,
                        target_language: row.get(2)?,
                        translation: row.get(3)?,
                        learning_status: LearningStatus::from(row.get::<_, String>(4)?),
                    })
                })?;

                let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(records)
            })
            .await
    }

    /// Count entries, in total and per status
    pub async fn stats(&self) -> Result<VocabularyStats> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT learning_status, COUNT(*) FROM vocabulary GROUP BY learning_status ORDER BY learning_status",
                )?;
                let by_status = stmt
                    .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;

                let total_entries = by_status.iter().map(|(_, count)| count).sum();

                Ok(VocabularyStats {
                    total_entries,
                    by_status,
                })
            })
            .await
    }
}

/// Vocabulary statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct VocabularyStats {
    /// Total number of stored words
    pub total_entries: i64,
    /// Word count per learning status label
    pub by_status: Vec<(String, i64)>,
}

impl std::fmt::Display for VocabularyStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Words: {}", self.total_entries)?;
        for (status, count) in &self.by_status {
            write!(f, ", {}: {}", status, count)?;
        }
        Ok(())
    }
}
