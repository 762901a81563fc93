//! Constant-time bearer-token check.
//!
//! One gate per configured secret; any entry point accepting external calls
//! for the same deployment applies the same gate.

use draftflow_models::ErrorCode;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Why a request failed authentication. Absent or malformed headers are
/// reported separately from a wrong token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("Authorization header required")]
    Missing,
    #[error("Invalid token")]
    Invalid,
}

impl AuthFailure {
    pub fn code(self) -> ErrorCode {
        match self {
            AuthFailure::Missing => ErrorCode::AuthMissing,
            AuthFailure::Invalid => ErrorCode::AuthInvalid,
        }
    }
}

/// Bearer-token gate for the configured shared secret.
#[derive(Clone)]
pub struct AuthGate {
    secret: String,
}

impl AuthGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Check an `Authorization` header value against the secret.
    pub fn check_header(&self, header: Option<&str>) -> Result<(), AuthFailure> {
        let token = header
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AuthFailure::Missing)?;
        if self.token_matches(token) {
            Ok(())
        } else {
            Err(AuthFailure::Invalid)
        }
    }

    /// HMAC both sides under the secret before comparing: unequal-length
    /// inputs reduce to equal-length digests, and the digest comparison is
    /// constant-time, so neither token length nor the position of the first
    /// differing byte is observable.
    fn token_matches(&self, provided: &str) -> bool {
        let mut expected = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        expected.update(self.secret.as_bytes());
        let expected = expected.finalize().into_bytes();

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(provided.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}
