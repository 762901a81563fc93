//! The MCP server: tool declarations, dispatch, and validation.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::schema_for_type,
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
    },
    service::{RequestContext, RoleServer},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use draftflow_client::CmsClient;
use draftflow_models::{
    ApiResult, ContentSummary, Locale, MediaDocument, MediaUploadSource, PublishStatus,
};

use crate::format::{ToolAction, content_result, media_result};
use crate::params::{
    CreatePostParams, CreateProjectParams, UpdatePostParams, UpdateProjectParams,
    UploadMediaParams,
};

/// Backend surface the tools dispatch to.
///
/// `CmsClient` is the production implementation; tests substitute scripted
/// fakes.
#[async_trait::async_trait]
pub trait ContentApi: Send + Sync {
    async fn create_post(&self, fields: Value, locale: Option<Locale>)
    -> ApiResult<ContentSummary>;
    async fn update_post(
        &self,
        id_or_slug: &str,
        fields: Value,
        locale: Option<Locale>,
    ) -> ApiResult<ContentSummary>;
    async fn create_project(
        &self,
        fields: Value,
        locale: Option<Locale>,
    ) -> ApiResult<ContentSummary>;
    async fn update_project(
        &self,
        id_or_slug: &str,
        fields: Value,
        locale: Option<Locale>,
    ) -> ApiResult<ContentSummary>;
    async fn upload_media(
        &self,
        source: MediaUploadSource,
        alt: Option<String>,
    ) -> ApiResult<MediaDocument>;
}

#[async_trait::async_trait]
impl ContentApi for CmsClient {
    async fn create_post(
        &self,
        fields: Value,
        locale: Option<Locale>,
    ) -> ApiResult<ContentSummary> {
        CmsClient::create_post(self, fields, locale).await
    }

    async fn update_post(
        &self,
        id_or_slug: &str,
        fields: Value,
        locale: Option<Locale>,
    ) -> ApiResult<ContentSummary> {
        CmsClient::update_post(self, id_or_slug, fields, locale).await
    }

    async fn create_project(
        &self,
        fields: Value,
        locale: Option<Locale>,
    ) -> ApiResult<ContentSummary> {
        CmsClient::create_project(self, fields, locale).await
    }

    async fn update_project(
        &self,
        id_or_slug: &str,
        fields: Value,
        locale: Option<Locale>,
    ) -> ApiResult<ContentSummary> {
        CmsClient::update_project(self, id_or_slug, fields, locale).await
    }

    async fn upload_media(
        &self,
        source: MediaUploadSource,
        alt: Option<String>,
    ) -> ApiResult<MediaDocument> {
        CmsClient::upload_media(self, source, alt.as_deref()).await
    }
}

/// MCP server bound to one content backend.
///
/// Cheap to construct and fully stateless; the front door builds a fresh
/// instance for every request.
#[derive(Clone)]
pub struct DraftflowMcpServer {
    api: Arc<dyn ContentApi>,
    base_url: String,
}

impl DraftflowMcpServer {
    pub fn new(client: CmsClient, base_url: impl Into<String>) -> Self {
        Self {
            api: Arc::new(client),
            base_url: base_url.into(),
        }
    }

    /// Build a server over any backend implementation.
    pub fn with_api(api: Arc<dyn ContentApi>, base_url: impl Into<String>) -> Self {
        Self {
            api,
            base_url: base_url.into(),
        }
    }

    async fn handle_create_post(&self, params: CreatePostParams) -> Result<String, String> {
        let locale = params.locale;
        let mut body = into_body(&params, &["locale"])?;
        default_status(&mut body);
        let res = self.api.create_post(body, locale).await;
        content_result(res, "post", ToolAction::Create, &self.base_url)
    }

    async fn handle_update_post(&self, params: UpdatePostParams) -> Result<String, String> {
        let locale = params.locale;
        let body = into_body(&params, &["idOrSlug", "locale"])?;
        let res = self.api.update_post(&params.id_or_slug, body, locale).await;
        content_result(res, "post", ToolAction::Update, &self.base_url)
    }

    async fn handle_create_project(&self, params: CreateProjectParams) -> Result<String, String> {
        validate_link_field("githubUrl", params.github_url.as_deref())
            .map_err(|reason| format!("Error creating project: {}", reason))?;
        validate_link_field("productionUrl", params.production_url.as_deref())
            .map_err(|reason| format!("Error creating project: {}", reason))?;

        let locale = params.locale;
        let mut body = into_body(&params, &["locale"])?;
        default_status(&mut body);
        let res = self.api.create_project(body, locale).await;
        content_result(res, "project", ToolAction::Create, &self.base_url)
    }

    async fn handle_update_project(&self, params: UpdateProjectParams) -> Result<String, String> {
        validate_link_field("githubUrl", params.github_url.as_deref())
            .map_err(|reason| format!("Error updating project: {}", reason))?;
        validate_link_field("productionUrl", params.production_url.as_deref())
            .map_err(|reason| format!("Error updating project: {}", reason))?;

        let locale = params.locale;
        let body = into_body(&params, &["idOrSlug", "locale"])?;
        let res = self
            .api
            .update_project(&params.id_or_slug, body, locale)
            .await;
        content_result(res, "project", ToolAction::Update, &self.base_url)
    }

    async fn handle_upload_media(&self, params: UploadMediaParams) -> Result<String, String> {
        let source = match (params.image_url, params.base64) {
            (None, None) => {
                return Err("Error: provide either imageUrl or base64 + mimeType".to_string());
            }
            // imageUrl wins when both are supplied.
            (Some(image_url), _) => MediaUploadSource::Url { image_url },
            (None, Some(base64)) => {
                let Some(mime_type) = params.mime_type else {
                    return Err("Error: mimeType is required when using base64".to_string());
                };
                MediaUploadSource::Inline { base64, mime_type }
            }
        };

        let res = self.api.upload_media(source, params.alt).await;
        media_result(res, &self.base_url)
    }
}

/// Serialize tool params into the backend body, dropping dispatch-only keys
/// (the locator and the locale selector travel out of band).
fn into_body<T: serde::Serialize>(params: &T, strip: &[&str]) -> Result<Value, String> {
    let mut value = serde_json::to_value(params)
        .map_err(|e| format!("Failed to serialize tool input: {}", e))?;
    if let Value::Object(map) = &mut value {
        for key in strip {
            map.remove(*key);
        }
    }
    Ok(value)
}

/// Creates always carry an explicit status so the backend never guesses.
fn default_status(body: &mut Value) {
    if let Value::Object(map) = body {
        map.entry("_status")
            .or_insert_with(|| Value::String(PublishStatus::Draft.as_str().to_string()));
    }
}

fn validate_link_field(name: &str, value: Option<&str>) -> Result<(), String> {
    let Some(value) = value else { return Ok(()) };
    let parsed =
        url::Url::parse(value).map_err(|e| format!("{} must be a valid URL: {}", name, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!(
            "{} must be an http(s) URL, got scheme '{}'",
            name, scheme
        )),
    }
}

fn parse_params<T: DeserializeOwned>(args: Value) -> Result<T, McpError> {
    serde_json::from_value(args)
        .map_err(|e| McpError::invalid_params(format!("Invalid parameters: {}", e), None))
}

impl ServerHandler for DraftflowMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "draftflow".to_string(),
                title: Some("Draftflow Content Bridge".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Draftflow content bridge - create and update blog posts and portfolio \
                 projects on the connected CMS and upload images to its media library. \
                 Everything is created as a draft unless _status is set to published. \
                 Upload images first with upload_media, then reference the returned \
                 media ID as heroImage."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = vec![
            Tool::new(
                "create_post",
                "Create a new blog post on the connected CMS. Content should be in markdown format. Posts are created as drafts by default.",
                schema_for_type::<CreatePostParams>(),
            ),
            Tool::new(
                "update_post",
                "Update an existing blog post by ID or slug. Only include fields you want to change. Use this to publish drafts by setting _status to \"published\".",
                schema_for_type::<UpdatePostParams>(),
            ),
            Tool::new(
                "create_project",
                "Create a new portfolio project on the connected CMS. Include technologies, GitHub URL, and production URL. Projects are created as drafts by default.",
                schema_for_type::<CreateProjectParams>(),
            ),
            Tool::new(
                "update_project",
                "Update an existing portfolio project by ID or slug. Only include fields you want to change.",
                schema_for_type::<UpdateProjectParams>(),
            ),
            Tool::new(
                "upload_media",
                "Upload an image to the CMS media library. Provide either imageUrl (preferred) to fetch and upload an image from a URL, or base64 + mimeType to upload raw image data. Returns a media ID to use as heroImage in create_post/create_project. Max 10MB, supports JPEG/PNG/WebP/GIF/SVG.",
                schema_for_type::<UploadMediaParams>(),
            ),
        ];

        Ok(ListToolsResult {
            meta: None,
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = Value::Object(request.arguments.unwrap_or_default());
        tracing::debug!(tool = %request.name, "dispatching tool call");

        let result = match request.name.as_ref() {
            "create_post" => self.handle_create_post(parse_params(args)?).await,
            "update_post" => self.handle_update_post(parse_params(args)?).await,
            "create_project" => self.handle_create_project(parse_params(args)?).await,
            "update_project" => self.handle_update_project(parse_params(args)?).await,
            "upload_media" => self.handle_upload_media(parse_params(args)?).await,
            other => Err(format!("Unknown tool: {}", other)),
        };

        match result {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(error) => Ok(CallToolResult::error(vec![Content::text(error)])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftflow_models::{ApiError, ErrorCode};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    enum Call {
        CreatePost {
            fields: Value,
            locale: Option<Locale>,
        },
        UpdatePost {
            id_or_slug: String,
            fields: Value,
            locale: Option<Locale>,
        },
        CreateProject {
            fields: Value,
        },
        UpdateProject {
            id_or_slug: String,
            fields: Value,
        },
        UploadMedia {
            source: MediaUploadSource,
            alt: Option<String>,
        },
    }

    #[derive(Default)]
    struct RecordingApi {
        fail_with: Option<ApiError>,
        calls: Mutex<Vec<Call>>,
    }

    impl RecordingApi {
        fn failing(code: ErrorCode, message: &str) -> Self {
            Self {
                fail_with: Some(ApiError::new(code, message)),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn summary(&self) -> ApiResult<ContentSummary> {
            match &self.fail_with {
                Some(err) => ApiResult::Error(err.clone()),
                None => ApiResult::Data(ContentSummary {
                    id: 101,
                    title: "T".to_string(),
                    slug: "t".to_string(),
                    status: PublishStatus::Draft,
                    created_at: "2025-06-01T10:00:00.000Z".to_string(),
                    updated_at: "2025-06-01T10:00:00.000Z".to_string(),
                }),
            }
        }
    }

    #[async_trait::async_trait]
    impl ContentApi for RecordingApi {
        async fn create_post(
            &self,
            fields: Value,
            locale: Option<Locale>,
        ) -> ApiResult<ContentSummary> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::CreatePost { fields, locale });
            self.summary()
        }

        async fn update_post(
            &self,
            id_or_slug: &str,
            fields: Value,
            locale: Option<Locale>,
        ) -> ApiResult<ContentSummary> {
            self.calls.lock().unwrap().push(Call::UpdatePost {
                id_or_slug: id_or_slug.to_string(),
                fields,
                locale,
            });
            self.summary()
        }

        async fn create_project(
            &self,
            fields: Value,
            _locale: Option<Locale>,
        ) -> ApiResult<ContentSummary> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::CreateProject { fields });
            self.summary()
        }

        async fn update_project(
            &self,
            id_or_slug: &str,
            fields: Value,
            _locale: Option<Locale>,
        ) -> ApiResult<ContentSummary> {
            self.calls.lock().unwrap().push(Call::UpdateProject {
                id_or_slug: id_or_slug.to_string(),
                fields,
            });
            self.summary()
        }

        async fn upload_media(
            &self,
            source: MediaUploadSource,
            alt: Option<String>,
        ) -> ApiResult<MediaDocument> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::UploadMedia { source, alt });
            match &self.fail_with {
                Some(err) => ApiResult::Error(err.clone()),
                None => ApiResult::Data(MediaDocument {
                    id: 5,
                    url: "/media/upload.png".to_string(),
                    filename: "upload.png".to_string(),
                    mime_type: "image/png".to_string(),
                    width: Some(16),
                    height: Some(16),
                }),
            }
        }
    }

    fn server_with(api: Arc<RecordingApi>) -> DraftflowMcpServer {
        DraftflowMcpServer::with_api(api, "https://cms.example.com")
    }

    #[tokio::test]
    async fn test_create_post_defaults_status_to_draft() {
        let api = Arc::new(RecordingApi::default());
        let server = server_with(api.clone());

        let params: CreatePostParams =
            serde_json::from_value(json!({"title": "T", "content": "body text"})).unwrap();
        let text = server.handle_create_post(params).await.unwrap();

        assert!(text.contains("ID:"));
        assert!(text.contains("Title: T"));
        assert!(text.contains("Status: draft"));

        let calls = api.calls();
        let Call::CreatePost { fields, locale } = &calls[0] else {
            panic!("expected a create_post call");
        };
        assert_eq!(fields["_status"], "draft");
        assert!(locale.is_none());
    }

    #[tokio::test]
    async fn test_create_post_keeps_explicit_status() {
        let api = Arc::new(RecordingApi::default());
        let server = server_with(api.clone());

        let params: CreatePostParams = serde_json::from_value(
            json!({"title": "T", "content": "c", "_status": "published"}),
        )
        .unwrap();
        server.handle_create_post(params).await.unwrap();

        let Call::CreatePost { fields, .. } = &api.calls()[0] else {
            panic!("expected a create_post call");
        };
        assert_eq!(fields["_status"], "published");
    }

    #[tokio::test]
    async fn test_update_post_strips_dispatch_fields() {
        let api = Arc::new(RecordingApi::default());
        let server = server_with(api.clone());

        let params: UpdatePostParams = serde_json::from_value(
            json!({"idOrSlug": "my-post", "title": "New", "locale": "en"}),
        )
        .unwrap();
        server.handle_update_post(params).await.unwrap();

        let Call::UpdatePost {
            id_or_slug,
            fields,
            locale,
        } = &api.calls()[0]
        else {
            panic!("expected an update_post call");
        };
        assert_eq!(id_or_slug, "my-post");
        assert_eq!(*locale, Some(Locale::En));
        assert!(fields.get("idOrSlug").is_none());
        assert!(fields.get("locale").is_none());
        assert_eq!(fields["title"], "New");
        // Partial update: nothing the caller omitted is sent.
        assert!(fields.get("content").is_none());
        assert!(fields.get("_status").is_none());
    }

    #[tokio::test]
    async fn test_update_project_rejects_non_http_link_before_dispatch() {
        let api = Arc::new(RecordingApi::default());
        let server = server_with(api.clone());

        let params: UpdateProjectParams = serde_json::from_value(
            json!({"idOrSlug": "my-proj", "githubUrl": "ftp://bad"}),
        )
        .unwrap();
        let error = server.handle_update_project(params).await.unwrap_err();

        assert!(error.contains("githubUrl"));
        assert!(api.calls().is_empty(), "no backend call may be made");
    }

    #[tokio::test]
    async fn test_create_project_accepts_https_links() {
        let api = Arc::new(RecordingApi::default());
        let server = server_with(api.clone());

        let params: CreateProjectParams = serde_json::from_value(json!({
            "title": "P",
            "description": "d",
            "githubUrl": "https://github.com/example/p",
            "technologies": ["Rust"]
        }))
        .unwrap();
        server.handle_create_project(params).await.unwrap();

        let Call::CreateProject { fields } = &api.calls()[0] else {
            panic!("expected a create_project call");
        };
        assert_eq!(fields["githubUrl"], "https://github.com/example/p");
        assert_eq!(fields["_status"], "draft");
    }

    #[tokio::test]
    async fn test_upload_media_requires_a_source() {
        let api = Arc::new(RecordingApi::default());
        let server = server_with(api.clone());

        let params: UploadMediaParams = serde_json::from_value(json!({})).unwrap();
        let error = server.handle_upload_media(params).await.unwrap_err();
        assert!(error.contains("provide either imageUrl or base64"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_media_base64_requires_mime_type() {
        let api = Arc::new(RecordingApi::default());
        let server = server_with(api.clone());

        let params: UploadMediaParams =
            serde_json::from_value(json!({"base64": "aGVsbG8="})).unwrap();
        let error = server.handle_upload_media(params).await.unwrap_err();
        assert!(error.contains("mimeType is required"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_media_url_wins_over_base64() {
        let api = Arc::new(RecordingApi::default());
        let server = server_with(api.clone());

        let params: UploadMediaParams = serde_json::from_value(json!({
            "imageUrl": "https://example.com/a.png",
            "base64": "aGVsbG8=",
            "mimeType": "image/png"
        }))
        .unwrap();
        server.handle_upload_media(params).await.unwrap();

        let Call::UploadMedia { source, .. } = &api.calls()[0] else {
            panic!("expected an upload_media call");
        };
        assert_eq!(
            *source,
            MediaUploadSource::Url {
                image_url: "https://example.com/a.png".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_backend_error_becomes_error_text() {
        let api = Arc::new(RecordingApi::failing(ErrorCode::NetworkError, "boom"));
        let server = server_with(api);

        let params: CreatePostParams =
            serde_json::from_value(json!({"title": "T", "content": "c"})).unwrap();
        let error = server.handle_create_post(params).await.unwrap_err();
        assert_eq!(error, "Error creating post: [NETWORK_ERROR] boom");
    }

    #[test]
    fn test_create_post_schema_marks_required_fields() {
        let schema = serde_json::to_value(schema_for_type::<CreatePostParams>()).unwrap();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(required.contains(&"title"));
        assert!(required.contains(&"content"));
        assert!(schema["properties"].get("locale").is_some());
    }
}
