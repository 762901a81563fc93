//! Result text formatting shared by the content tools.
//!
//! Every tool answers with a human-readable text block; failures use the
//! `Error {action} {entity}: [{CODE}] {message}` shape so the calling agent
//! can log the stable code while reading the message.

use draftflow_models::{ApiResult, ContentSummary, MediaDocument};

/// The write the tool performed, for result wording.
#[derive(Debug, Clone, Copy)]
pub enum ToolAction {
    Create,
    Update,
}

impl ToolAction {
    pub fn done(self) -> &'static str {
        match self {
            ToolAction::Create => "created",
            ToolAction::Update => "updated",
        }
    }

    pub fn doing(self) -> &'static str {
        match self {
            ToolAction::Create => "creating",
            ToolAction::Update => "updating",
        }
    }
}

/// Format a content write result. `Ok` is the success text, `Err` the error
/// text destined for an `isError` envelope.
pub fn content_result(
    res: ApiResult<ContentSummary>,
    collection: &str,
    action: ToolAction,
    base_url: &str,
) -> Result<String, String> {
    match res {
        ApiResult::Data(doc) => Ok([
            format!("{} {} successfully.", capitalize(collection), action.done()),
            format!("  ID: {}", doc.id),
            format!("  Title: {}", doc.title),
            format!("  Slug: {}", doc.slug),
            format!("  Status: {}", doc.status),
            format!(
                "  Admin: {}/admin/collections/{}s/{}",
                base_url, collection, doc.id
            ),
        ]
        .join("\n")),
        ApiResult::Error(err) => Err(format!(
            "Error {} {}: [{}] {}",
            action.doing(),
            collection,
            err.code,
            err.message
        )),
    }
}

/// Format a media upload result.
pub fn media_result(res: ApiResult<MediaDocument>, base_url: &str) -> Result<String, String> {
    match res {
        ApiResult::Data(doc) => {
            let dimensions = match (doc.width, doc.height) {
                (Some(width), Some(height)) => format!("{}x{}", width, height),
                _ => "N/A (vector)".to_string(),
            };
            Ok([
                "Media uploaded successfully.".to_string(),
                format!(
                    "  ID: {} (use this ID for heroImage in posts/projects)",
                    doc.id
                ),
                format!("  Filename: {}", doc.filename),
                format!("  URL: {}{}", base_url, doc.url),
                format!("  Dimensions: {}", dimensions),
                format!("  Type: {}", doc.mime_type),
            ]
            .join("\n"))
        }
        ApiResult::Error(err) => Err(format!(
            "Error uploading media: [{}] {}",
            err.code, err.message
        )),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftflow_models::{ApiError, ErrorCode, PublishStatus};

    fn summary() -> ContentSummary {
        ContentSummary {
            id: 42,
            title: "Launch notes".to_string(),
            slug: "launch-notes".to_string(),
            status: PublishStatus::Draft,
            created_at: "2025-06-01T10:00:00.000Z".to_string(),
            updated_at: "2025-06-01T10:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_content_success_text() {
        let text = content_result(
            ApiResult::Data(summary()),
            "post",
            ToolAction::Create,
            "https://cms.example.com",
        )
        .unwrap();

        assert!(text.starts_with("Post created successfully."));
        assert!(text.contains("  ID: 42"));
        assert!(text.contains("  Title: Launch notes"));
        assert!(text.contains("  Status: draft"));
        assert!(text.contains("  Admin: https://cms.example.com/admin/collections/posts/42"));
    }

    #[test]
    fn test_content_error_text() {
        let res: ApiResult<ContentSummary> = ApiResult::Error(ApiError::new(
            ErrorCode::ValidationError,
            "title is required",
        ));
        let text = content_result(res, "project", ToolAction::Update, "https://cms.example.com")
            .unwrap_err();
        assert_eq!(
            text,
            "Error updating project: [VALIDATION_ERROR] title is required"
        );
    }

    #[test]
    fn test_media_success_text_with_vector_fallback() {
        let res = ApiResult::Data(MediaDocument {
            id: 7,
            url: "/media/upload.svg".to_string(),
            filename: "upload.svg".to_string(),
            mime_type: "image/svg+xml".to_string(),
            width: None,
            height: None,
        });
        let text = media_result(res, "https://cms.example.com").unwrap();
        assert!(text.contains("  ID: 7"));
        assert!(text.contains("  URL: https://cms.example.com/media/upload.svg"));
        assert!(text.contains("  Dimensions: N/A (vector)"));
    }
}
