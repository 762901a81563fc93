//! Shared wire types for the Draftflow CMS bridge.
//!
//! Everything crossing the bridge boundary lives here: the `{data}`/`{error}`
//! API envelope, the stable error codes, the content/media summaries the CMS
//! returns after a write, and the small enumerations (locale, publication
//! status, content format) the tool schemas expose.
//!
//! With the `schema` feature enabled the param-facing types also derive
//! `schemars::JsonSchema` so they can be embedded in tool input schemas.

pub mod api;
pub mod content;

pub use api::{ApiError, ApiResult, ErrorCode};
pub use content::{
    CategoryRef, ContentFormat, ContentSummary, Locale, MediaDocument, MediaUploadSource,
    MetaFields, PublishStatus,
};
