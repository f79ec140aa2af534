use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::language_utils::get_language_name;
use crate::providers::{Language, Translator};

/// Public Cloud Translation endpoint
pub const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com";

/// Google Cloud Translation (v2) client
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL
    endpoint: String,
    /// Language used for the display names of `supported_languages`
    display_language: String,
}

/// Translate request body
#[derive(Debug, Serialize)]
pub struct TranslateRequest<'a> {
    /// Text to translate
    pub q: &'a str,
    /// Source language code
    pub source: &'a str,
    /// Target language code
    pub target: &'a str,
}

/// Translate response envelope
#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    pub data: TranslateData,
}

#[derive(Debug, Deserialize)]
pub struct TranslateData {
    pub translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    /// Translated text, HTML-escaped
    pub translated_text: String,
}

/// Languages response envelope
#[derive(Debug, Deserialize)]
pub struct LanguagesResponse {
    pub data: LanguagesData,
}

#[derive(Debug, Deserialize)]
pub struct LanguagesData {
    pub languages: Vec<LanguageEntry>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageEntry {
    pub language: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl LanguageEntry {
    /// Display name: the one the API sent, else the English ISO name, else
    /// the code itself
    pub fn into_language(self) -> Language {
        let name = self
            .name
            .filter(|n| !n.is_empty())
            .or_else(|| get_language_name(&self.language).ok())
            .unwrap_or_else(|| self.language.clone());

        Language {
            code: self.language,
            name,
        }
    }
}

/// Error body returned by Google APIs
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

impl GoogleTranslate {
    /// Create a new client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            display_language: "en".to_string(),
        })
    }

    /// Set the language used for language display names
    pub fn with_display_language(mut self, language: impl Into<String>) -> Self {
        self.display_language = language.into();
        self
    }

    fn url(&self, path: &str) -> String {
        let base = if self.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}{}", base, path)
    }

    /// Turn a non-success response into a provider error
    async fn error_from_response(response: reqwest::Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        error!("Cloud Translation API error ({}): {}", status, message);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::AuthenticationError(message)
            }
            _ => ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            },
        }
    }

    /// Extract the first translation from a response
    pub fn extract_text(response: TranslateResponse) -> Result<String, ProviderError> {
        response
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| ProviderError::ParseError("response contained no translations".to_string()))
    }
}

#[async_trait]
impl Translator for GoogleTranslate {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        debug!("Translating {} chars ({} -> {})", text.chars().count(), source_language, target_language);

        let request = TranslateRequest {
            q: text,
            source: source_language,
            target: target_language,
        };

        let response = self
            .client
            .post(self.url("/language/translate/v2"))
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response.json::<TranslateResponse>().await?;
        Self::extract_text(body)
    }

    async fn supported_languages(&self) -> Result<Vec<Language>, ProviderError> {
        let response = self
            .client
            .get(self.url("/language/translate/v2/languages"))
            .query(&[
                ("key", self.api_key.as_str()),
                ("target", self.display_language.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response.json::<LanguagesResponse>().await?;
        Ok(body
            .data
            .languages
            .into_iter()
            .map(LanguageEntry::into_language)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractText_shouldReturnFirstTranslation() {
        let body = r#"{"data":{"translations":[{"translatedText":"l&#39;arbre","detectedSourceLanguage":"en"}]}}"#;
        let response: TranslateResponse = serde_json::from_str(body).unwrap();

        assert_eq!(GoogleTranslate::extract_text(response).unwrap(), "l&#39;arbre");
    }

    #[test]
    fn test_extractText_withNoTranslations_shouldFailWithParseError() {
        let response: TranslateResponse =
            serde_json::from_str(r#"{"data":{"translations":[]}}"#).unwrap();

        let err = GoogleTranslate::extract_text(response).unwrap_err();
        assert_eq!(err.category(), "ParseError");
    }

    #[test]
    fn test_languagesResponse_shouldParseWithOptionalNames() {
        let body = r#"{"data":{"languages":[{"language":"es","name":"Spanish"},{"language":"ko"}]}}"#;
        let response: LanguagesResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.data.languages.len(), 2);
        assert_eq!(response.data.languages[1].name, None);
    }

    #[test]
    fn test_intoLanguage_withoutName_shouldFallBackToIsoName() {
        let body = r#"{"data":{"languages":[
            {"language":"es","name":"Español"},
            {"language":"ko"},
            {"language":"zh-TW"},
            {"language":"hmn"},
            {"language":"xx-YY","name":""}
        ]}}"#;
        let response: LanguagesResponse = serde_json::from_str(body).unwrap();

        let languages: Vec<Language> = response
            .data
            .languages
            .into_iter()
            .map(LanguageEntry::into_language)
            .collect();

        let names: Vec<&str> = languages.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Español", "Korean", "Chinese", "Hmong", "xx-YY"]);
        assert_eq!(languages[2].code, "zh-TW");
    }

    #[test]
    fn test_url_withCustomEndpoint_shouldTrimSlash() {
        let client = GoogleTranslate::new("key", "http://localhost:8080/", 5).unwrap();
        assert_eq!(
            client.url("/language/translate/v2"),
            "http://localhost:8080/language/translate/v2"
        );

        let client = GoogleTranslate::new("key", "", 5).unwrap();
        assert!(client.url("/x").starts_with(DEFAULT_ENDPOINT));
    }
}
