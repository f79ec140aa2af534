/*!
 * Tests for the sentence cache as used by the vocabulary service
 */

use std::sync::Arc;

use lector::database::Repository;
use lector::providers::mock::MockTranslator;
use lector::translation::{SentenceCache, TranslateRequest, VocabularyService};

#[test]
fn test_sentenceCache_clones_shouldShareEntries() {
    let cache = SentenceCache::new(true);
    let clone = cache.clone();

    cache.put("Hola mundo", "es", "en", "Hello world");

    assert_eq!(clone.get("Hola mundo", "es", "en").as_deref(), Some("Hello world"));
    assert_eq!(clone.len(), 1);
}

#[test]
fn test_sentenceCache_keys_shouldIncludeBothLanguages() {
    let cache = SentenceCache::new(true);
    cache.put("Hola", "es", "en", "Hello");

    assert!(cache.get("Hola", "es", "fr").is_none());
    assert!(cache.get("Hola", "pt", "en").is_none());

    let (hits, misses, _) = cache.stats();
    assert_eq!(hits, 0);
    assert_eq!(misses, 2);
}

#[tokio::test]
async fn test_translate_sameSentenceTwice_shouldCallBackendOnce() {
    let translator = MockTranslator::working();
    let service = VocabularyService::new(
        Repository::new_in_memory().unwrap(),
        Arc::new(translator.clone()),
    );
    let sentence = "El gato duerme.";

    let first = service
        .translate(&TranslateRequest::new("gato", "es", "en").with_sentence(sentence))
        .await
        .unwrap();
    let second = service
        .translate(&TranslateRequest::new("duerme", "es", "en").with_sentence(sentence))
        .await
        .unwrap();

    assert_eq!(first.translated_sentence, second.translated_sentence);
    assert_eq!(translator.calls_for(sentence), 1);
    assert_eq!(service.sentence_cache().len(), 1);
}

#[tokio::test]
async fn test_translate_withDisabledCache_shouldRetranslateSentences() {
    let translator = MockTranslator::working();
    let service = VocabularyService::with_cache(
        Repository::new_in_memory().unwrap(),
        Arc::new(translator.clone()),
        SentenceCache::new(false),
    );
    let request = TranslateRequest::new("gato", "es", "en").with_sentence("Un gato.");

    service.translate(&request).await.unwrap();
    service.translate(&request).await.unwrap();

    assert_eq!(translator.calls_for("Un gato."), 2);
    // The word itself is served from the store the second time
    assert_eq!(translator.calls_for("gato"), 1);
    assert!(service.sentence_cache().is_empty());
}
