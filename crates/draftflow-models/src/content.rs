//! Content and media types returned by (or sent to) the CMS external API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Publication status of a content document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Draft,
    Published,
}

impl PublishStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStatus::Draft => "draft",
            PublishStatus::Published => "published",
        }
    }
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content locale served by the CMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Pl,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Pl => "pl",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format of a content body field. The backend converts markdown to its
/// structured document format; lexical bodies are stored as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Markdown,
    Lexical,
}

/// SEO metadata attached to posts and projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct MetaFields {
    /// SEO title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// SEO description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Media ID for OG image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<i64>,
}

/// Category reference: an existing numeric ID or a name (auto-created by the
/// backend).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum CategoryRef {
    Id(i64),
    Name(String),
}

/// Minimal identifying fields the CMS returns after a content write.
///
/// The full document is never pulled across the bridge; extra fields in the
/// response are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(rename = "_status")]
    pub status: PublishStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Media document the CMS returns after an upload. Width and height are
/// absent for vector images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDocument {
    pub id: i64,
    pub url: String,
    pub filename: String,
    pub mime_type: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Source material for a media upload: a remote URL to fetch, or inline
/// base64 data with its declared MIME type. Exactly one variant per upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaUploadSource {
    Url { image_url: String },
    Inline { base64: String, mime_type: String },
}
