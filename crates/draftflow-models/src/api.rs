//! The success-or-error envelope shared by the CMS external API and this bridge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable machine-readable error codes crossing the bridge boundary.
///
/// Codes the bridge produces itself and codes the CMS backend returns share
/// one type; anything unrecognized deserializes to `Unknown` instead of
/// failing the whole envelope parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NetworkError,
    InvalidResponse,
    HttpError,
    InvalidUrl,
    ImageFetchFailed,
    FetchFailed,
    InvalidType,
    FileTooLarge,
    UploadFailed,
    ValidationError,
    AuthMissing,
    AuthInvalid,
    NotFound,
    ServiceUnavailable,
    InternalError,
    MethodNotAllowed,
    /// Any code this bridge does not recognize, passed through from the backend.
    #[serde(other)]
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::InvalidResponse => "INVALID_RESPONSE",
            ErrorCode::HttpError => "HTTP_ERROR",
            ErrorCode::InvalidUrl => "INVALID_URL",
            ErrorCode::ImageFetchFailed => "IMAGE_FETCH_FAILED",
            ErrorCode::FetchFailed => "FETCH_FAILED",
            ErrorCode::InvalidType => "INVALID_TYPE",
            ErrorCode::FileTooLarge => "FILE_TOO_LARGE",
            ErrorCode::UploadFailed => "UPLOAD_FAILED",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::AuthMissing => "AUTH_MISSING",
            ErrorCode::AuthInvalid => "AUTH_INVALID",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error payload inside the API envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Uniform result of every backend operation: exactly one of data or error.
///
/// Serializes to the `{"data": …}` / `{"error": {"code", "message"}}` wire
/// shape of the CMS external API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ApiResult<T> {
    #[serde(rename = "data")]
    Data(T),
    #[serde(rename = "error")]
    Error(ApiError),
}

impl<T> ApiResult<T> {
    /// Shorthand for building an error envelope.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error(ApiError::new(code, message))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ApiResult::Error(_))
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            ApiResult::Data(data) => Some(data),
            ApiResult::Error(_) => None,
        }
    }

    pub fn into_error(self) -> Option<ApiError> {
        match self {
            ApiResult::Data(_) => None,
            ApiResult::Error(error) => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_envelope_round_trip() {
        let result: ApiResult<i64> = serde_json::from_str(r#"{"data": 42}"#).unwrap();
        assert!(!result.is_error());
        assert_eq!(result.clone().into_data(), Some(42));

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"data":42}"#);
    }

    #[test]
    fn test_error_envelope_round_trip() {
        let result: ApiResult<i64> =
            serde_json::from_str(r#"{"error": {"code": "NOT_FOUND", "message": "no such post"}}"#)
                .unwrap();
        let error = result.into_error().unwrap();
        assert_eq!(error.code, ErrorCode::NotFound);
        assert_eq!(error.message, "no such post");
    }

    #[test]
    fn test_error_code_wire_names() {
        let json = serde_json::to_string(&ErrorCode::FileTooLarge).unwrap();
        assert_eq!(json, r#""FILE_TOO_LARGE""#);
        assert_eq!(ErrorCode::NetworkError.to_string(), "NETWORK_ERROR");
    }

    #[test]
    fn test_unrecognized_code_deserializes_to_unknown() {
        let result: ApiResult<i64> =
            serde_json::from_str(r#"{"error": {"code": "RATE_LIMITED", "message": "slow down"}}"#)
                .unwrap();
        assert_eq!(result.into_error().unwrap().code, ErrorCode::Unknown);
    }

    #[test]
    fn test_error_details_are_ignored() {
        // The backend may attach a free-form `details` object; only code and
        // message are part of the contract.
        let result: ApiResult<i64> = serde_json::from_str(
            r#"{"error": {"code": "VALIDATION_ERROR", "message": "title is required", "details": {"field": "title"}}}"#,
        )
        .unwrap();
        assert_eq!(result.into_error().unwrap().code, ErrorCode::ValidationError);
    }
}
