//! Input parameter types for the content tools.
//!
//! Doc comments become the `description` fields of the generated JSON
//! schemas. `deny_unknown_fields` turns unknown or misspelled fields into a
//! dispatch-time error instead of silently dropped data, so nothing reaches
//! the network on a malformed call.

use draftflow_models::{CategoryRef, ContentFormat, Locale, MetaFields, PublishStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the create_post tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePostParams {
    /// Post title
    pub title: String,
    /// Post content in markdown format
    pub content: String,
    /// Content format (default: markdown)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_format: Option<ContentFormat>,
    /// Media ID from upload_media tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<i64>,
    /// Category names (auto-created) or IDs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryRef>>,
    /// SEO metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaFields>,
    /// Publication status (default: draft)
    #[serde(default, rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status: Option<PublishStatus>,
    /// ISO 8601 publish date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// User IDs credited as authors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<i64>>,
    /// Content locale (default: pl)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
}

/// Parameters for the update_post tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePostParams {
    /// Post ID (numeric) or slug to update
    pub id_or_slug: String,
    /// Post title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Post content in markdown format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Content format (default: markdown)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_format: Option<ContentFormat>,
    /// Media ID from upload_media tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<i64>,
    /// Category names (auto-created) or IDs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryRef>>,
    /// SEO metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaFields>,
    /// Publication status
    #[serde(default, rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status: Option<PublishStatus>,
    /// ISO 8601 publish date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// User IDs credited as authors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<i64>>,
    /// Content locale (default: pl)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
}

/// Parameters for the create_project tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProjectParams {
    /// Project title
    pub title: String,
    /// Project description in markdown format
    pub description: String,
    /// Content format (default: markdown)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_format: Option<ContentFormat>,
    /// Media ID from upload_media tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<i64>,
    /// Technology names, e.g. ["Next.js", "TypeScript"]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    /// GitHub repository URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    /// Live production URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_url: Option<String>,
    /// SEO metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaFields>,
    /// Publication status (default: draft)
    #[serde(default, rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status: Option<PublishStatus>,
    /// ISO 8601 publish date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Content locale (default: pl)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
}

/// Parameters for the update_project tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProjectParams {
    /// Project ID (numeric) or slug to update
    pub id_or_slug: String,
    /// Project title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Project description in markdown format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Content format (default: markdown)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_format: Option<ContentFormat>,
    /// Media ID from upload_media tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<i64>,
    /// Technology names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    /// GitHub repository URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    /// Live production URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_url: Option<String>,
    /// SEO metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaFields>,
    /// Publication status
    #[serde(default, rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status: Option<PublishStatus>,
    /// ISO 8601 publish date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Content locale (default: pl)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
}

/// Parameters for the upload_media tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UploadMediaParams {
    /// URL of the image to download and upload (preferred over base64)
    #[serde(default)]
    pub image_url: Option<String>,
    /// Base64-encoded image data (use only if imageUrl is not available)
    #[serde(default)]
    pub base64: Option<String>,
    /// MIME type of the base64 image (required when using base64)
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Alt text for the image
    #[serde(default)]
    pub alt: Option<String>,
}
