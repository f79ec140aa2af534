/*!
 * Page processing followed by word lookups
 */

use anyhow::Result;
use std::sync::Arc;

use lector::database::LearningStatus;
use lector::document::{DocumentProcessor, TextData};
use lector::providers::mock::{MockOcr, MockTokenizer, MockTranslator};
use lector::translation::TranslateRequest;
use crate::common;

#[tokio::test]
async fn test_processedPage_tokens_shouldFeedBulkStatuses() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let service = common::open_service(&common::database_path(dir.path()), MockTranslator::working())?;
    let processor = DocumentProcessor::new(Arc::new(MockOcr::returning("나는 사과를 먹어요")))
        .with_tokenizer(Arc::new(MockTokenizer::for_languages(&["ko"])));

    let document = processor.process(b"page", "page.png", Some("ko-KR")).await?;
    let tokens = match &document.pages[0].text_data {
        TextData::Tokenized { tokens } => tokens.clone(),
        other => panic!("expected tokens, got {:?}", other),
    };
    assert_eq!(tokens, vec!["나는", "사과를", "먹어요"]);

    service.translate(&TranslateRequest::new(&tokens[1], "ko", "es")).await?;
    service
        .update_status(&tokens[1], "ko", "es", &LearningStatus::Known)
        .await?;

    let statuses = service.bulk_statuses(&tokens, "ko", "es").await?;
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses.get("사과를"), Some(&LearningStatus::Known));
    Ok(())
}

#[tokio::test]
async fn test_processedDocument_shouldSerializeWithTaggedTextData() -> Result<()> {
    let processor = DocumentProcessor::new(Arc::new(MockOcr::returning("Bonjour")));

    let document = processor.process(b"img", "page.png", Some("fr")).await?;
    let json = serde_json::to_value(&document)?;

    assert_eq!(json["pages"][0]["full_text"], "Bonjour");
    assert_eq!(json["pages"][0]["text_data"]["type"], "plain");
    assert_eq!(json["pages"][0]["text_data"]["text"], "Bonjour");
    Ok(())
}
