/*!
 * Tests for word normalization and language code reduction
 */

use lector::language_utils::{get_language_name, validate_language_code};
use lector::translation::{normalize_word, primary_language};

#[test]
fn test_normalizeWord_withPunctuationAndCase_shouldStripAndLowercase() {
    assert_eq!(normalize_word("Hello!"), "hello");
    assert_eq!(normalize_word("«Mañana»,"), "mañana");
    assert_eq!(normalize_word("well-known"), "well-known");
    assert_eq!(normalize_word("l'homme"), "lhomme");
}

#[test]
fn test_normalizeWord_isIdempotent() {
    for raw in ["Über!", "猫が", "Straße.", "  Spaced  ", "¿Qué?", "CAPS-lock"] {
        let once = normalize_word(raw);
        assert_eq!(normalize_word(&once), once, "not idempotent for {:?}", raw);
    }
}

#[test]
fn test_normalizeWord_withNonLatinScripts_shouldKeepLetters() {
    assert_eq!(normalize_word("猫。"), "猫");
    assert_eq!(normalize_word("사랑해요!"), "사랑해요");
    assert_eq!(normalize_word("Привет,"), "привет");
}

#[test]
fn test_normalizeWord_withOnlyPunctuation_shouldBeEmpty() {
    assert_eq!(normalize_word("?!."), "");
    assert_eq!(normalize_word(""), "");
}

#[test]
fn test_primaryLanguage_shouldDropRegionSubtag() {
    assert_eq!(primary_language("en-US"), "en");
    assert_eq!(primary_language("zh_TW"), "zh");
    assert_eq!(primary_language("ko"), "ko");
}

#[test]
fn test_languageUtils_withLocale_shouldResolvePrimaryLanguage() {
    assert!(validate_language_code("pt-BR").is_ok());
    assert!(validate_language_code("xx-YY").is_err());
    assert_eq!(get_language_name("ko-KR").unwrap(), "Korean");
}
