//! Identity-provider seam.
//!
//! The backend authenticates with short-lived identity tokens, so the
//! client fetches a fresh token from the provider for every request
//! rather than caching one. Sign-in flows (phone OTP, OAuth) live with
//! the provider, not here; this crate only needs something that yields
//! a bearer token on demand.

use async_trait::async_trait;

/// The token provider could not produce a token (signed out, refresh
/// failed, provider unreachable).
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct AuthError(pub String);

/// Source of bearer tokens for backend requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// A currently valid identity token.
    async fn token(&self) -> Result<String, AuthError>;
}

/// A fixed token, for tests and service credentials.
pub struct StaticToken(String);

impl StaticToken {
    /// Wrap a fixed token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}
