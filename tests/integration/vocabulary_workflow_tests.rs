/*!
 * End-to-end reading session tests over a file-backed vocabulary store
 */

use anyhow::Result;

use lector::database::{LearningStatus, VocabularyFilter};
use lector::providers::mock::MockTranslator;
use lector::translation::{TranslateRequest, TranslationSource};
use crate::common;

/// Look up a word, study it, then learn it
#[tokio::test]
async fn test_readingSession_shouldTrackWordThroughStatuses() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::database_path(dir.path());
    let translator = MockTranslator::working().with_translation("perro", "dog");
    let service = common::open_service(&path, translator.clone())?;

    let first = service
        .translate(&TranslateRequest::new("¡Perro!", "es-MX", "en"))
        .await?;
    assert_eq!(first.translation.as_deref(), Some("dog"));
    assert_eq!(first.status, LearningStatus::New);
    assert_eq!(first.source, TranslationSource::Api);

    assert!(
        service
            .update_status("perro", "es", "en", &LearningStatus::Learning)
            .await?
    );

    let second = service
        .translate(&TranslateRequest::new("PERRO", "es-ES", "en"))
        .await?;
    assert_eq!(second.source, TranslationSource::Cache);
    assert_eq!(second.status, LearningStatus::Learning);
    assert_eq!(translator.calls_for("perro"), 1);

    let statuses = service
        .bulk_statuses(
            &["Perro,".to_string(), "gato".to_string()],
            "es",
            "en",
        )
        .await?;
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses.get("perro"), Some(&LearningStatus::Learning));

    assert!(service.edit_translation("perro", "es", "en", "hound").await?);
    let third = service.translate(&TranslateRequest::new("perro", "es", "en")).await?;
    assert_eq!(third.translation.as_deref(), Some("hound"));

    Ok(())
}

/// Entries survive a restart; sentence translations do not
#[tokio::test]
async fn test_reopen_shouldKeepWordsButNotSentences() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::database_path(dir.path());
    let sentence = "Le chat dort.";

    {
        let service = common::open_service(&path, MockTranslator::working())?;
        service
            .translate(&TranslateRequest::new("chat", "fr", "en").with_sentence(sentence))
            .await?;
        service
            .update_status("chat", "fr", "en", &LearningStatus::Known)
            .await?;
    }

    let translator = MockTranslator::working();
    let service = common::open_service(&path, translator.clone())?;
    let result = service
        .translate(&TranslateRequest::new("Chat", "fr", "en").with_sentence(sentence))
        .await?;

    assert_eq!(result.source, TranslationSource::Cache);
    assert_eq!(result.status, LearningStatus::Known);
    assert_eq!(translator.calls_for("chat"), 0);
    assert_eq!(translator.calls_for(sentence), 1);
    Ok(())
}

/// The same word is a separate entry per language pair
#[tokio::test]
async fn test_sameWordInTwoPairs_shouldBeIndependentEntries() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::database_path(dir.path());
    let service = common::open_service(&path, MockTranslator::working())?;

    service.translate(&TranslateRequest::new("pan", "es", "en")).await?;
    service.translate(&TranslateRequest::new("pan", "es", "fr")).await?;
    service
        .update_status("pan", "es", "fr", &LearningStatus::Known)
        .await?;

    let es_en = service
        .list_vocabulary(&VocabularyFilter::from_query(None, Some("es-en"))?)
        .await?;
    assert_eq!(es_en.len(), 1);
    assert_eq!(es_en[0].learning_status, LearningStatus::New);

    let known = service
        .list_vocabulary(&VocabularyFilter::from_query(Some("known"), Some("todos"))?)
        .await?;
    assert_eq!(known.len(), 1);
    assert_eq!(known[0].target_language, "fr");

    assert!(service.delete_word("pan", "es", "en").await?);
    assert!(!service.delete_word("pan", "es", "en").await?);

    let remaining = service.list_vocabulary(&VocabularyFilter::default()).await?;
    assert_eq!(remaining.len(), 1);
    Ok(())
}

/// Words read in their own language are known immediately
#[tokio::test]
async fn test_sameLanguage_shouldMarkKnownWithoutBackend() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::database_path(dir.path());
    let translator = MockTranslator::working();
    let service = common::open_service(&path, translator.clone())?;

    let result = service
        .translate(&TranslateRequest::new("House.", "en-US", "en"))
        .await?;

    assert_eq!(result.source, TranslationSource::SameLanguage);
    assert_eq!(result.translation.as_deref(), Some("house"));
    assert_eq!(result.status, LearningStatus::Known);
    assert_eq!(translator.call_count(), 0);

    let stats = service.repository().stats().await?;
    assert_eq!(stats.total_entries, 1);
    assert_eq!(stats.by_status, vec![("known".to_string(), 1)]);
    Ok(())
}

/// Status changes and edits on unknown words report that nothing matched
#[tokio::test]
async fn test_updates_onUnknownWord_shouldReturnFalse() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::database_path(dir.path());
    let service = common::open_service(&path, MockTranslator::working())?;

    assert!(
        !service
            .update_status("nada", "es", "en", &LearningStatus::Known)
            .await?
    );
    assert!(!service.edit_translation("nada", "es", "en", "nothing").await?);
    assert!(service.list_vocabulary(&VocabularyFilter::default()).await?.is_empty());
    Ok(())
}

/// Backend answers are HTML-unescaped before being stored
#[tokio::test]
async fn test_translate_withEscapedAnswer_shouldStoreUnescapedText() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::database_path(dir.path());
    let translator = MockTranslator::working().with_translation("aujourdhui", "today&#39;s");
    let service = common::open_service(&path, translator)?;

    let result = service
        .translate(&TranslateRequest::new("aujourd'hui", "fr", "en"))
        .await?;
    assert_eq!(result.translation.as_deref(), Some("today's"));

    let stored = common::open_repository(&path)?
        .lookup("aujourdhui", "fr", "en")
        .await?
        .expect("entry stored");
    assert_eq!(stored.translation.as_deref(), Some("today's"));
    Ok(())
}
