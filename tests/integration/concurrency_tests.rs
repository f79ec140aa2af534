/*!
 * Concurrent access to the vocabulary store
 */

use anyhow::Result;
use std::sync::Arc;

use lector::database::{LearningStatus, VocabularyFilter};
use lector::providers::mock::MockTranslator;
use lector::translation::{TranslateRequest, VocabularyService};
use crate::common;

#[tokio::test]
async fn test_concurrentSaves_ofSameWord_shouldKeepOneEntry() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let repository = common::open_repository(&common::database_path(dir.path()))?;

    let mut handles = Vec::new();
    for i in 0..16 {
        let repository = repository.clone();
        handles.push(tokio::spawn(async move {
            repository
                .save("sol", "es", "en", &format!("sun #{}", i))
                .await
        }));
    }

    let mut inserted = 0;
    for handle in handles {
        if handle.await?? {
            inserted += 1;
        }
    }

    assert_eq!(inserted, 1);
    let entries = repository.list(&VocabularyFilter::default()).await?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].learning_status, LearningStatus::New);
    Ok(())
}

#[tokio::test]
async fn test_concurrentTranslations_ofSameWord_shouldNotFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::database_path(dir.path());
    let service = Arc::new(common::open_service(&path, MockTranslator::working())?);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service: Arc<VocabularyService> = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.translate(&TranslateRequest::new("Luna", "es", "en")).await
        }));
    }

    for handle in handles {
        let result = handle.await??;
        assert_eq!(result.translation.as_deref(), Some("[en] luna"));
    }

    let stats = service.repository().stats().await?;
    assert_eq!(stats.total_entries, 1);
    Ok(())
}

#[tokio::test]
async fn test_bulkStatuses_withManyWords_shouldSpanChunks() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::database_path(dir.path());
    let service = common::open_service(&path, MockTranslator::working())?;
    let repository = service.repository();

    let words: Vec<String> = (0..1200).map(|i| format!("palabra{}", i)).collect();
    for word in words.iter().step_by(100) {
        repository.save(word, "es", "en", "word").await?;
        repository
            .update_status(word, "es", "en", &LearningStatus::Learning)
            .await?;
    }

    let statuses = service.bulk_statuses(&words, "es", "en").await?;

    assert_eq!(statuses.len(), 12);
    assert!(statuses.values().all(|s| *s == LearningStatus::Learning));
    assert!(statuses.contains_key("palabra1100"));
    Ok(())
}
