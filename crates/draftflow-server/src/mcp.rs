//! The authenticated `/mcp` endpoint.
//!
//! Stateless streamable-HTTP MCP service: every request is authenticated,
//! served by a fresh `DraftflowMcpServer` from the factory closure, and torn
//! down when the response (or the connection) ends. Non-POST verbs are
//! rejected before authentication, matching the single-verb contract of the
//! endpoint.

use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tower_http::limit::RequestBodyLimitLayer;

use draftflow_client::CmsClient;
use draftflow_mcp::DraftflowMcpServer;

use crate::auth::{AuthGate, require_bearer};
use crate::error::ApiErrorResponse;

const MAX_BODY_BYTES: usize = 15 * 1024 * 1024;

pub fn mcp_router(gate: Arc<AuthGate>, client: CmsClient) -> Router {
    let service = StreamableHttpService::new(
        {
            let client = client.clone();
            move || {
                let base_url = client.base_url().to_string();
                Ok(DraftflowMcpServer::new(client.clone(), base_url))
            }
        },
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            stateful_mode: false,
            ..Default::default()
        },
    );

    Router::new()
        .fallback_service(service)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(move |req: Request, next: Next| {
            let gate = gate.clone();
            async move { require_bearer(gate, req, next).await }
        }))
        .layer(axum::middleware::from_fn(reject_non_post))
}

async fn reject_non_post(req: Request, next: Next) -> Response {
    if req.method() != Method::POST {
        return ApiErrorResponse::method_not_allowed().into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
    };
    use draftflow_client::CmsConfig;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let gate = Arc::new(AuthGate::new("test-secret"));
        let client = CmsClient::new(CmsConfig {
            base_url: "http://cms.invalid".to_string(),
            token: "cms-token".to_string(),
        });
        Router::new().nest("/mcp", mcp_router(gate, client))
    }

    async fn error_code(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        body["error"]["code"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_non_post_is_method_not_allowed() {
        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .method("GET")
                    .uri("/mcp")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(error_code(response).await, "METHOD_NOT_ALLOWED");
    }

    #[tokio::test]
    async fn test_missing_auth_is_rejected() {
        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "AUTH_MISSING");
    }

    #[tokio::test]
    async fn test_wrong_token_is_rejected() {
        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header("Content-Type", "application/json")
                    .header("Authorization", "Bearer not-the-secret")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "AUTH_INVALID");
    }

    #[tokio::test]
    async fn test_authenticated_initialize_round_trip() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/mcp")
            .header("Content-Type", "application/json")
            .header("Accept", "application/json, text/event-stream")
            .header("Authorization", "Bearer test-secret")
            .body(Body::from(
                r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-11-25","capabilities":{},"clientInfo":{"name":"test","version":"1.0"}}}"#,
            ))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
