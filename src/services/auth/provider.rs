//! Identity provider capability.
//!
//! The gate never talks to a concrete provider; it is handed an
//! `Arc<dyn IdentityProvider>` at construction so tests can swap in doubles.
use async_trait::async_trait;
use thiserror::Error;

use crate::services::auth::identity::Identity;

/// Why a provider could not produce an identity.
///
/// Kept for logs only. The gate collapses every variant into one rejection.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("token rejected by provider (status {status})")]
    Rejected { status: u16 },

    #[error("provider unavailable (status {status})")]
    Unavailable { status: u16 },

    #[error("provider transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("provider configuration error: {0}")]
    Configuration(String),

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange a raw bearer token for the identity it belongs to.
    async fn lookup_identity(&self, token: &str) -> Result<Identity, ProviderError>;

    // Provider name (for logging).
    fn name(&self) -> &'static str;
}
