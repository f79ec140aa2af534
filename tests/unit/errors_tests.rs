/*!
 * Tests for the error taxonomy seen by callers
 */

use std::sync::Arc;

use lector::database::Repository;
use lector::errors::{ErrorKind, ProviderError, VocabularyError};
use lector::providers::mock::MockTranslator;
use lector::translation::{TranslateRequest, VocabularyService};

#[test]
fn test_errorKind_shouldSerializeAsSnakeCase() {
    assert_eq!(serde_json::to_string(&ErrorKind::InvalidInput).unwrap(), "\"invalid_input\"");
    assert_eq!(
        serde_json::to_string(&ErrorKind::ServiceUnavailable).unwrap(),
        "\"service_unavailable\""
    );
    assert_eq!(serde_json::to_string(&ErrorKind::Storage).unwrap(), "\"storage\"");
}

#[test]
fn test_providerCategory_shouldNameEachVariant() {
    let cases = [
        (ProviderError::RequestFailed("x".into()), "RequestFailed"),
        (ProviderError::ParseError("x".into()), "ParseError"),
        (ProviderError::ConnectionError("x".into()), "ConnectionError"),
        (ProviderError::AuthenticationError("x".into()), "AuthenticationError"),
        (ProviderError::Unavailable("x".into()), "Unavailable"),
    ];

    for (error, category) in cases {
        assert_eq!(error.category(), category);
        let converted: VocabularyError = error.into();
        assert_eq!(converted.to_string(), format!("Service error: {}", category));
    }
}

#[tokio::test]
async fn test_translate_withFailingBackend_shouldNotSaveAnything() {
    let repository = Repository::new_in_memory().unwrap();
    let service = VocabularyService::new(repository.clone(), Arc::new(MockTranslator::failing()));

    let err = service
        .translate(&TranslateRequest::new("perro", "es", "en"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    assert!(repository.lookup("perro", "es", "en").await.unwrap().is_none());
}

#[tokio::test]
async fn test_translate_withPunctuationOnly_shouldBeInvalidInput() {
    let translator = MockTranslator::working();
    let service = VocabularyService::new(
        Repository::new_in_memory().unwrap(),
        Arc::new(translator.clone()),
    );

    let err = service
        .translate(&TranslateRequest::new("¡!", "es", "en"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(translator.call_count(), 0);
}
