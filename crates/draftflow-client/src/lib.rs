//! Client side of the Draftflow bridge.
//!
//! This crate owns the two outbound-facing pieces: the URL safety validator
//! that guards caller-supplied image URLs against SSRF, and `CmsClient`, the
//! typed wrapper over the CMS external content API. All client operations
//! return `ApiResult` — failure is data, never a raised error.

pub mod client;
pub mod network;

pub use client::{CmsClient, CmsConfig};
pub use network::{is_restricted_ip, validate_url};
