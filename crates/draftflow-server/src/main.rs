mod auth;
mod config;
mod error;
mod mcp;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use tower_http::catch_panic::CatchPanicLayer;

use draftflow_client::{CmsClient, CmsConfig};

use auth::AuthGate;
use config::ServerConfig;

#[derive(serde::Serialize)]
struct Health {
    status: &'static str,
    server: &'static str,
    version: &'static str,
}

/// Unauthenticated liveness probe; reports identity only, touches nothing.
async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        server: "draftflow",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn app(gate: Arc<AuthGate>, client: CmsClient) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/mcp", mcp::mcp_router(gate, client))
        .layer(CatchPanicLayer::custom(error::PanicEnvelope))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,draftflow_server=debug".into()),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::load()?;

    let client = CmsClient::new(CmsConfig {
        base_url: config.cms_base_url.clone(),
        token: config.cms_token.clone(),
    });
    let gate = Arc::new(AuthGate::new(config.auth_token.clone()));

    let app = app(gate, client);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("draftflow server listening on {}", addr);
    tracing::info!("bridging to CMS at {}", config.cms_base_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("draftflow server shutting down");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let gate = Arc::new(AuthGate::new("test-secret"));
        let client = CmsClient::new(CmsConfig {
            base_url: "http://cms.invalid".to_string(),
            token: "cms-token".to_string(),
        });
        app(gate, client)
    }

    #[tokio::test]
    async fn test_health_is_open_and_static() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["server"], "draftflow");
        assert!(body["version"].as_str().is_some());
    }
}
