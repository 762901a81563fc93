//! Axum middleware applying the auth gate to the MCP endpoint.

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::AuthGate;
use crate::error::ApiErrorResponse;

pub async fn require_bearer(gate: Arc<AuthGate>, req: Request, next: Next) -> Response {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match gate.check_header(header_value) {
        Ok(()) => next.run(req).await,
        Err(failure) => {
            tracing::debug!(code = %failure.code(), "rejected MCP request");
            ApiErrorResponse::unauthorized(failure.code(), failure.to_string()).into_response()
        }
    }
}
