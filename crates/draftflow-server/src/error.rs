//! JSON error envelopes produced by the front door itself.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use draftflow_models::ErrorCode;
use serde_json::json;

/// An error the transport layer answers with directly, before (or instead
/// of) the MCP service.
#[derive(Debug)]
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiErrorResponse {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::MethodNotAllowed,
            "Use POST for MCP requests",
        )
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError,
            "Internal server error",
        )
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        }));
        (self.status, body).into_response()
    }
}

/// Maps a panic below the catch layer to the 500 envelope, so a programming
/// defect degrades to an error response instead of a dropped connection.
#[derive(Debug, Clone, Copy)]
pub struct PanicEnvelope;

impl tower_http::catch_panic::ResponseForPanic for PanicEnvelope {
    type ResponseBody = axum::body::Body;

    fn response_for_panic(
        &mut self,
        _err: Box<dyn std::any::Any + Send + 'static>,
    ) -> axum::http::Response<Self::ResponseBody> {
        tracing::error!("panic while handling request");
        ApiErrorResponse::internal().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let response = ApiErrorResponse::method_not_allowed();
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.code, ErrorCode::MethodNotAllowed);
    }
}
