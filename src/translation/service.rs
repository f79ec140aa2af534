/*!
 * Vocabulary service.
 *
 * Orchestrates a word lookup: normalize the word, answer from the
 * vocabulary store when possible, otherwise ask the translator once and
 * remember the answer. Sentence translations are remembered in the
 * in-memory `SentenceCache` only and never reach the store.
 *
 * The service is the single façade used by the request layer; every word
 * that enters through it is normalized first, so the same raw word maps to
 * the same stored entry whichever operation receives it.
 */

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::database::{LearningStatus, Repository, VocabularyFilter, VocabularyRecord};
use crate::errors::{VocabularyError, VocabularyResult};
use crate::providers::{Language, Translator};
use crate::translation::cache::SentenceCache;
use crate::translation::normalize::{normalize_word, primary_language};

/// A request to translate a selected word, optionally with its sentence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateRequest {
    /// Word as selected by the reader
    pub word: String,
    /// Sentence the word appeared in
    #[serde(default)]
    pub sentence: Option<String>,
    /// Source language code or locale (`en`, `en-US`)
    pub source_language: String,
    /// Target language code, used as given (`es`, `zh-TW`)
    pub target_language: String,
}

impl TranslateRequest {
    /// Create a word-only request
    pub fn new(word: &str, source_language: &str, target_language: &str) -> Self {
        Self {
            word: word.to_string(),
            sentence: None,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        }
    }

    /// Attach the surrounding sentence
    pub fn with_sentence(mut self, sentence: &str) -> Self {
        self.sentence = Some(sentence.to_string());
        self
    }
}

/// Where a word translation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationSource {
    /// Source and target language are equal; nothing was translated
    SameLanguage,
    /// Served from the vocabulary store
    Cache,
    /// Fetched from the translation backend
    Api,
}

/// Answer to a `TranslateRequest`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTranslation {
    /// Translation of the normalized word
    pub translation: Option<String>,
    /// Learning status of the word
    pub status: LearningStatus,
    /// Where the translation came from
    pub source: TranslationSource,
    /// Sentence as submitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_sentence: Option<String>,
    /// Translated sentence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_sentence: Option<String>,
}

/// Vocabulary service
#[derive(Clone)]
pub struct VocabularyService {
    /// Persistent word store
    repository: Repository,
    /// Translation backend
    translator: Arc<dyn Translator>,
    /// Sentence translations seen during this process
    sentence_cache: SentenceCache,
}

impl VocabularyService {
    /// Create a new service with a fresh sentence cache
    pub fn new(repository: Repository, translator: Arc<dyn Translator>) -> Self {
        Self::with_cache(repository, translator, SentenceCache::default())
    }

    /// Create a new service around an existing sentence cache
    pub fn with_cache(
        repository: Repository,
        translator: Arc<dyn Translator>,
        sentence_cache: SentenceCache,
    ) -> Self {
        Self {
            repository,
            translator,
            sentence_cache,
        }
    }

    /// The sentence cache owned by this service
    pub fn sentence_cache(&self) -> &SentenceCache {
        &self.sentence_cache
    }

    /// The underlying store
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Translate a word and, if given, its sentence
    pub async fn translate(&self, request: &TranslateRequest) -> VocabularyResult<WordTranslation> {
        let (source, target) = language_pair(&request.source_language, &request.target_language);
        let word = normalized_or_invalid(&request.word)?;

        if source == target {
            self.repository.save(&word, source, target, &word).await?;
            self.repository
                .update_status(&word, source, target, &LearningStatus::Known)
                .await?;
            debug!("'{}' is already in {}, marked as known", word, source);

            return Ok(WordTranslation {
                translation: Some(word),
                status: LearningStatus::Known,
                source: TranslationSource::SameLanguage,
                source_sentence: None,
                translated_sentence: None,
            });
        }

        let mut response = match self.repository.lookup(&word, source, target).await? {
            Some(stored) => {
                debug!("'{}' ({} -> {}) served from the vocabulary store", word, source, target);
                WordTranslation {
                    translation: stored.translation,
                    status: stored.status,
                    source: TranslationSource::Cache,
                    source_sentence: None,
                    translated_sentence: None,
                }
            }
            None => {
                let translation = self.fetch_translation(&word, source, target).await?;
                self.repository.save(&word, source, target, &translation).await?;
                info!("Added '{}' ({} -> {}) to the vocabulary", word, source, target);

                WordTranslation {
                    translation: Some(translation),
                    status: LearningStatus::New,
                    source: TranslationSource::Api,
                    source_sentence: None,
                    translated_sentence: None,
                }
            }
        };

        if let Some(sentence) = request.sentence.as_deref().filter(|s| !s.trim().is_empty()) {
            let translated = self.translate_sentence(sentence, source, target).await?;
            response.source_sentence = Some(sentence.to_string());
            response.translated_sentence = Some(translated);
        }

        Ok(response)
    }

    /// Translate a sentence, consulting the in-memory cache first
    pub async fn translate_sentence(
        &self,
        sentence: &str,
        source_language: &str,
        target_language: &str,
    ) -> VocabularyResult<String> {
        if let Some(cached) = self.sentence_cache.get(sentence, source_language, target_language) {
            return Ok(cached);
        }

        let translated = self
            .fetch_translation(sentence, source_language, target_language)
            .await?;
        self.sentence_cache
            .put(sentence, source_language, target_language, &translated);

        Ok(translated)
    }

    async fn fetch_translation(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> VocabularyResult<String> {
        let raw = self
            .translator
            .translate(text, source_language, target_language)
            .await?;
        Ok(html_escape::decode_html_entities(&raw).into_owned())
    }

    /// Languages offered by the translation backend
    pub async fn supported_languages(&self) -> VocabularyResult<Vec<Language>> {
        Ok(self.translator.supported_languages().await?)
    }

    /// Set the learning status of a word. Returns whether the word exists.
    pub async fn update_status(
        &self,
        word: &str,
        source_language: &str,
        target_language: &str,
        status: &LearningStatus,
    ) -> VocabularyResult<bool> {
        let word = normalize_word(word);
        let (source, target) = language_pair(source_language, target_language);
        Ok(self
            .repository
            .update_status(&word, source, target, status)
            .await?)
    }

    /// Statuses of every known word among `words`, keyed by normalized word
    ///
    /// Words missing from the result are unknown and should be treated as
    /// new.
    pub async fn bulk_statuses(
        &self,
        words: &[String],
        source_language: &str,
        target_language: &str,
    ) -> VocabularyResult<HashMap<String, LearningStatus>> {
        let normalized: Vec<String> = words
            .iter()
            .map(|w| normalize_word(w))
            .filter(|w| !w.is_empty())
            .collect();
        let (source, target) = language_pair(source_language, target_language);

        Ok(self
            .repository
            .bulk_lookup_status(&normalized, source, target)
            .await?)
    }

    /// List stored words
    pub async fn list_vocabulary(
        &self,
        filter: &VocabularyFilter,
    ) -> VocabularyResult<Vec<VocabularyRecord>> {
        Ok(self.repository.list(filter).await?)
    }

    /// Replace the translation of a word. Returns whether the word exists.
    pub async fn edit_translation(
        &self,
        word: &str,
        source_language: &str,
        target_language: &str,
        new_translation: &str,
    ) -> VocabularyResult<bool> {
        let word = normalize_word(word);
        let (source, target) = language_pair(source_language, target_language);
        Ok(self
            .repository
            .edit_translation(&word, source, target, new_translation)
            .await?)
    }

    /// Remove a word. Returns whether anything was removed.
    pub async fn delete_word(
        &self,
        word: &str,
        source_language: &str,
        target_language: &str,
    ) -> VocabularyResult<bool> {
        let word = normalize_word(word);
        let (source, target) = language_pair(source_language, target_language);
        Ok(self
            .repository
            .delete(&word, source, target)
            .await?)
    }
}

/// Reduce the source to its primary subtag; keep the target as given.
///
/// Regional targets such as `zh-TW` and `pt-BR` are distinct translation
/// targets, so they are never shortened.
fn language_pair<'a>(source_language: &'a str, target_language: &'a str) -> (&'a str, &'a str) {
    (primary_language(source_language), target_language.trim())
}

fn normalized_or_invalid(raw: &str) -> VocabularyResult<String> {
    let word = normalize_word(raw);
    if word.trim().is_empty() {
        return Err(VocabularyError::InvalidInput(format!(
            "'{}' contains no word characters",
            raw
        )));
    }
    Ok(word)
}
