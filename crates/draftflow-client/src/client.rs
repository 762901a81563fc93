//! Typed client for the CMS external content API.
//!
//! One `CmsClient` is built at startup and shared for the process lifetime;
//! it owns the base URL, the bearer token, and the per-operation timeouts.
//! Nothing here retries and nothing here throws: every failure mode —
//! transport, protocol, resource limit, SSRF rejection — is normalized into
//! the `ApiResult` envelope so callers treat all outcomes uniformly.

use std::time::Duration;

use base64::Engine as _;
use futures::StreamExt;
use reqwest::{Client, Method, header};
use serde::de::DeserializeOwned;
use serde_json::Value;

use draftflow_models::{
    ApiError, ApiResult, ContentSummary, ErrorCode, Locale, MediaDocument, MediaUploadSource,
};

use crate::network::validate_url;

const ALLOWED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/gif",
    "image/svg+xml",
];
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

const JSON_TIMEOUT: Duration = Duration::from_secs(30);
const IMAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(15);
// Uploads include the backend's own processing of the binary, so they get
// more headroom than plain JSON calls.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection parameters for the CMS external API.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub base_url: String,
    pub token: String,
}

/// Client for the CMS external content API.
#[derive(Clone)]
pub struct CmsClient {
    http: Client,
    base_url: String,
    token: String,
}

impl CmsClient {
    pub fn new(config: CmsConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
        }
    }

    /// Base URL of the CMS without a trailing slash (used for admin links).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, locale: Option<Locale>) -> String {
        match locale {
            Some(locale) => format!("{}/api/external{}?locale={}", self.base_url, path, locale),
            None => format!("{}/api/external{}", self.base_url, path),
        }
    }

    pub async fn create_post(
        &self,
        fields: Value,
        locale: Option<Locale>,
    ) -> ApiResult<ContentSummary> {
        self.request_json(Method::POST, "/posts".to_string(), fields, locale)
            .await
    }

    pub async fn update_post(
        &self,
        id_or_slug: &str,
        fields: Value,
        locale: Option<Locale>,
    ) -> ApiResult<ContentSummary> {
        let path = format!("/posts/{}", urlencoding::encode(id_or_slug));
        self.request_json(Method::PATCH, path, fields, locale).await
    }

    pub async fn create_project(
        &self,
        fields: Value,
        locale: Option<Locale>,
    ) -> ApiResult<ContentSummary> {
        self.request_json(Method::POST, "/projects".to_string(), fields, locale)
            .await
    }

    pub async fn update_project(
        &self,
        id_or_slug: &str,
        fields: Value,
        locale: Option<Locale>,
    ) -> ApiResult<ContentSummary> {
        let path = format!("/projects/{}", urlencoding::encode(id_or_slug));
        self.request_json(Method::PATCH, path, fields, locale).await
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: String,
        body: Value,
        locale: Option<Locale>,
    ) -> ApiResult<T> {
        let url = self.url(&path, locale);
        let response = self
            .http
            .request(method, &url)
            .bearer_auth(&self.token)
            .json(&body)
            .timeout(JSON_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(response) => parse_response(response).await,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "CMS request failed");
                ApiResult::error(ErrorCode::NetworkError, format!("Failed to reach API: {}", e))
            }
        }
    }

    /// Upload an image to the CMS media library.
    ///
    /// URL sources are SSRF-validated, fetched with a short timeout, and
    /// checked against the MIME allow-list and the 10 MiB cap — once from the
    /// `Content-Length` header before the download and again against the
    /// actual bytes, since headers can lie or be absent. Inline sources skip
    /// the fetch but face the same type and size checks.
    pub async fn upload_media(
        &self,
        source: MediaUploadSource,
        alt: Option<&str>,
    ) -> ApiResult<MediaDocument> {
        let (bytes, mime_type) = match self.resolve_media_source(source).await {
            Ok(resolved) => resolved,
            Err(error) => return ApiResult::Error(error),
        };

        // Filename comes from the MIME subtype, never from caller input.
        let filename = format!("upload.{}", extension_from_mime_type(&mime_type, "bin"));
        let part = match reqwest::multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str(&mime_type)
        {
            Ok(part) => part,
            Err(e) => {
                return ApiResult::error(
                    ErrorCode::InvalidType,
                    format!("Unusable MIME type {}: {}", mime_type, e),
                );
            }
        };
        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(alt) = alt {
            form = form.text("alt", alt.to_string());
        }

        let response = self
            .http
            .post(self.url("/media", None))
            .bearer_auth(&self.token)
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(response) => parse_response(response).await,
            Err(e) => ApiResult::error(
                ErrorCode::UploadFailed,
                format!("Failed to upload media: {}", e),
            ),
        }
    }

    async fn resolve_media_source(
        &self,
        source: MediaUploadSource,
    ) -> Result<(Vec<u8>, String), ApiError> {
        match source {
            MediaUploadSource::Url { image_url } => self.fetch_image(&image_url).await,
            MediaUploadSource::Inline { base64, mime_type } => {
                decode_inline_image(&base64, mime_type)
            }
        }
    }

    async fn fetch_image(&self, image_url: &str) -> Result<(Vec<u8>, String), ApiError> {
        if let Err(reason) = validate_url(image_url) {
            return Err(ApiError::new(ErrorCode::InvalidUrl, reason));
        }

        let response = self
            .http
            .get(image_url)
            .timeout(IMAGE_FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                ApiError::new(
                    ErrorCode::ImageFetchFailed,
                    format!("Failed to fetch image from URL: {}", e),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ErrorCode::FetchFailed,
                format!("Failed to fetch image from URL: HTTP {}", status.as_u16()),
            ));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
            .unwrap_or_default();
        check_image_headers(&content_type, response.content_length())?;

        // Stream with a running cap so a lying or hostile server cannot make
        // us buffer past the limit before we notice.
        let mut stream = response.bytes_stream();
        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                ApiError::new(
                    ErrorCode::ImageFetchFailed,
                    format!("Failed to read image body: {}", e),
                )
            })?;
            if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(file_too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok((bytes, content_type))
    }
}

/// Header-level checks on a URL-sourced image response, run before the body
/// is downloaded.
fn check_image_headers(content_type: &str, content_length: Option<u64>) -> Result<(), ApiError> {
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        let shown = if content_type.is_empty() {
            "(none)"
        } else {
            content_type
        };
        return Err(ApiError::new(
            ErrorCode::InvalidType,
            format!(
                "URL returned unsupported content-type: {}. Allowed: {}",
                shown,
                ALLOWED_IMAGE_TYPES.join(", ")
            ),
        ));
    }
    if let Some(length) = content_length
        && length > MAX_IMAGE_BYTES as u64
    {
        return Err(file_too_large());
    }
    Ok(())
}

fn decode_inline_image(data: &str, mime_type: String) -> Result<(Vec<u8>, String), ApiError> {
    if !ALLOWED_IMAGE_TYPES.contains(&mime_type.as_str()) {
        return Err(ApiError::new(
            ErrorCode::InvalidType,
            format!(
                "Unsupported image type: {}. Allowed: {}",
                mime_type,
                ALLOWED_IMAGE_TYPES.join(", ")
            ),
        ));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| {
            ApiError::new(
                ErrorCode::ValidationError,
                format!("base64 data is not valid: {}", e),
            )
        })?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(file_too_large());
    }
    Ok((bytes, mime_type))
}

fn file_too_large() -> ApiError {
    ApiError::new(ErrorCode::FileTooLarge, "Image exceeds 10MB limit")
}

fn extension_from_mime_type(mime_type: &str, fallback: &str) -> String {
    match mime_type.split('/').nth(1) {
        Some(subtype) if !subtype.is_empty() => subtype.replace("svg+xml", "svg"),
        _ => fallback.to_string(),
    }
}

/// Normalize a backend HTTP response into the envelope.
///
/// A body that parses as `{data}`/`{error}` is returned as-is (an `{error}`
/// carried in a 2xx included); `{data}` on a non-2xx status is demoted to
/// `HTTP_ERROR`; JSON that is not the envelope or a body that is not JSON at
/// all become `INVALID_RESPONSE`/`HTTP_ERROR` per the failure taxonomy.
async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            return ApiResult::error(
                ErrorCode::NetworkError,
                format!("Failed to read API response: {}", e),
            );
        }
    };

    match serde_json::from_slice::<ApiResult<T>>(&body) {
        Ok(ApiResult::Data(_)) if !status.is_success() => ApiResult::error(
            ErrorCode::HttpError,
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("error")
            ),
        ),
        Ok(result) => result,
        Err(_) => {
            if serde_json::from_slice::<Value>(&body).is_ok() {
                if status.is_success() {
                    ApiResult::error(
                        ErrorCode::InvalidResponse,
                        format!(
                            "API response did not match the expected envelope (HTTP {})",
                            status.as_u16()
                        ),
                    )
                } else {
                    ApiResult::error(
                        ErrorCode::HttpError,
                        format!(
                            "HTTP {}: {}",
                            status.as_u16(),
                            status.canonical_reason().unwrap_or("error")
                        ),
                    )
                }
            } else {
                ApiResult::error(
                    ErrorCode::InvalidResponse,
                    format!("API returned non-JSON response (HTTP {})", status.as_u16()),
                )
            }
        }
    }
}
