//! MCP tool surface for the Draftflow CMS bridge.
//!
//! Exposes the content operations — create/update post, create/update
//! project, upload media — as MCP tools with schema-validated inputs and a
//! uniform text/error result envelope. The handler layer is written against
//! the `ContentApi` trait; `CmsClient` is the production implementation.

pub mod format;
pub mod params;
pub mod server;

pub use params::{
    CreatePostParams, CreateProjectParams, UpdatePostParams, UpdateProjectParams,
    UploadMediaParams,
};
pub use server::{ContentApi, DraftflowMcpServer};
