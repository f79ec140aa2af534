use anyhow::{Result, anyhow};
use isolang::Language;

use crate::translation::primary_language;

/// Language utilities for ISO language code handling
///
/// Locale tags such as `en-US` or `zh_TW` are reduced to their primary
/// subtag before being checked against ISO 639-1 (2-letter) and
/// ISO 639-3 (3-letter) codes.
fn lookup(code: &str) -> Option<Language> {
    let normalized = primary_language(code).to_lowercase();

    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    }
}

/// Validate that a code or locale names a known language
pub fn validate_language_code(code: &str) -> Result<()> {
    lookup(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Get the English language name for a code or locale
pub fn get_language_name(code: &str) -> Result<String> {
    let lang = lookup(code).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    Ok(lang.to_name().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validateLanguageCode_withLocale_shouldUsePrimarySubtag() {
        assert!(validate_language_code("en-US").is_ok());
        assert!(validate_language_code("ko").is_ok());
        assert!(validate_language_code("spa").is_ok());
        assert!(validate_language_code("xx").is_err());
        assert!(validate_language_code("").is_err());
    }

    #[test]
    fn test_getLanguageName_shouldReturnEnglishName() {
        assert_eq!(get_language_name("ja").unwrap(), "Japanese");
        assert_eq!(get_language_name("es-MX").unwrap(), "Spanish");
    }
}
