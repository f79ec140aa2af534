use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{OcrEngine, OcrResult};

/// Public Cloud Vision endpoint
pub const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com";

/// Pages `files:annotate` accepts in one synchronous request
pub const PAGES_PER_REQUEST: u32 = 5;

const DOCUMENT_TEXT_DETECTION: &str = "DOCUMENT_TEXT_DETECTION";
const PDF_MIME_TYPE: &str = "application/pdf";

/// Google Cloud Vision client using dense document text detection
#[derive(Debug)]
pub struct GoogleVision {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL
    endpoint: String,
}

/// `images:annotate` request body
#[derive(Debug, Serialize)]
pub struct AnnotateRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_context: Option<ImageContext>,
}

#[derive(Debug, Serialize)]
pub struct ImageContent {
    /// Base64-encoded image bytes
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContext {
    pub language_hints: Vec<String>,
}

/// `files:annotate` request body
#[derive(Debug, Serialize)]
pub struct AnnotateFilesRequest {
    pub requests: Vec<AnnotateFileRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateFileRequest {
    pub input_config: InputConfig,
    pub features: Vec<Feature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_context: Option<ImageContext>,
    /// 1-based page numbers; the service reads pages 1-5 when empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
    /// Base64-encoded file bytes
    pub content: String,
    pub mime_type: String,
}

/// `images:annotate` response body
#[derive(Debug, Deserialize)]
pub struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    #[serde(default)]
    pub full_text_annotation: Option<TextAnnotation>,
    #[serde(default)]
    pub error: Option<Status>,
}

/// `files:annotate` response body
#[derive(Debug, Deserialize)]
pub struct AnnotateFilesResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateFileResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateFileResponse {
    /// One entry per requested page, in request order
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub error: Option<Status>,
}

#[derive(Debug, Deserialize)]
pub struct TextAnnotation {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl Status {
    fn into_error(self) -> Option<ProviderError> {
        if self.message.is_empty() {
            return None;
        }
        Some(ProviderError::ApiError {
            status_code: u16::try_from(self.code).unwrap_or(0),
            message: self.message,
        })
    }
}

fn document_text_features() -> Vec<Feature> {
    vec![Feature {
        feature_type: DOCUMENT_TEXT_DETECTION.to_string(),
    }]
}

fn image_context(language_hint: &str) -> Option<ImageContext> {
    if language_hint.is_empty() {
        return None;
    }
    Some(ImageContext {
        language_hints: vec![language_hint.to_string()],
    })
}

impl AnnotateRequest {
    /// Build a single-image document text detection request
    pub fn document_text(image: &[u8], language_hint: &str) -> Self {
        Self {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image),
                },
                features: document_text_features(),
                image_context: image_context(language_hint),
            }],
        }
    }
}

impl AnnotateFilesRequest {
    /// Build a PDF document text detection request for `pages`
    ///
    /// `content` is the already base64-encoded file, so a multi-request
    /// document is encoded once.
    pub fn pdf_pages(content: &str, language_hint: &str, pages: Vec<u32>) -> Self {
        Self {
            requests: vec![AnnotateFileRequest {
                input_config: InputConfig {
                    content: content.to_string(),
                    mime_type: PDF_MIME_TYPE.to_string(),
                },
                features: document_text_features(),
                image_context: image_context(language_hint),
                pages,
            }],
        }
    }
}

impl GoogleVision {
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
        })
    }

    fn url(&self, method: &str) -> String {
        let base = if self.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/v1/{}", base, method)
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, method: &str, body: &B) -> Result<R, ProviderError> {
        let response = self
            .client
            .post(self.url(method))
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Cloud Vision API error ({}): {}", status, message);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ProviderError::AuthenticationError(message)
                }
                _ => ProviderError::ApiError {
                    status_code: status.as_u16(),
                    message,
                },
            });
        }

        Ok(response.json::<R>().await?)
    }

    /// Text of one image or page
    ///
    /// An image without any text yields an empty string.
    fn page_text(page: AnnotateImageResponse) -> Result<OcrResult, ProviderError> {
        if let Some(err) = page.error.and_then(Status::into_error) {
            return Err(err);
        }

        Ok(OcrResult {
            full_text: page
                .full_text_annotation
                .map(|annotation| annotation.text)
                .unwrap_or_default(),
        })
    }

    /// Extract the text of the first image response
    pub fn extract_text(response: AnnotateResponse) -> Result<OcrResult, ProviderError> {
        let first = response
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ParseError("response contained no results".to_string()))?;

        Self::page_text(first)
    }

    /// Extract the page texts of the first file response, with the total
    /// page count of the document
    pub fn extract_pages(response: AnnotateFilesResponse) -> Result<(Vec<OcrResult>, u32), ProviderError> {
        let file = response
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ParseError("response contained no file results".to_string()))?;

        if let Some(err) = file.error.and_then(Status::into_error) {
            return Err(err);
        }

        let pages = file
            .responses
            .into_iter()
            .map(Self::page_text)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((pages, file.total_pages))
    }
}

/// Page numbers of the batch starting at `first`, capped at `total`
fn page_batch(first: u32, total: u32) -> Vec<u32> {
    (first..=total.min(first + PAGES_PER_REQUEST - 1)).collect()
}

#[async_trait]
impl OcrEngine for GoogleVision {
    async fn extract_text(&self, image: &[u8], language_hint: &str) -> Result<OcrResult, ProviderError> {
        debug!("Running text detection on {} bytes (hint: {})", image.len(), language_hint);

        let request = AnnotateRequest::document_text(image, language_hint);
        let body: AnnotateResponse = self.post("images:annotate", &request).await?;
        Self::extract_text(body)
    }

    async fn extract_pages(&self, document: &[u8], language_hint: &str) -> Result<Vec<OcrResult>, ProviderError> {
        debug!("Running PDF text detection on {} bytes (hint: {})", document.len(), language_hint);
        let content = STANDARD.encode(document);

        // The first request reads the default first pages and reports the total
        let request = AnnotateFilesRequest::pdf_pages(&content, language_hint, Vec::new());
        let body: AnnotateFilesResponse = self.post("files:annotate", &request).await?;
        let (mut pages, total_pages) = Self::extract_pages(body)?;

        let mut next = pages.len() as u32 + 1;
        while next <= total_pages {
            let batch = page_batch(next, total_pages);
            debug!("Reading PDF pages {:?} of {}", batch, total_pages);

            let request = AnnotateFilesRequest::pdf_pages(&content, language_hint, batch);
            let body: AnnotateFilesResponse = self.post("files:annotate", &request).await?;
            let (batch_pages, _) = Self::extract_pages(body)?;
            if batch_pages.is_empty() {
                return Err(ProviderError::ParseError(format!(
                    "no text results for PDF page {}",
                    next
                )));
            }

            next += batch_pages.len() as u32;
            pages.extend(batch_pages);
        }

        Ok(pages)
    }
}
