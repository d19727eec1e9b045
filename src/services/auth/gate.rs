//! Bearer token verification gate.
//!
//! One decision per request: extract the bearer credential, exchange it with
//! the identity provider, admit or reject. The gate holds no session and never
//! retries a failed lookup.

use std::sync::Arc;

use crate::services::auth::credential::{HeaderSource, bearer_token};
use crate::services::auth::identity::Identity;
use crate::services::auth::provider::IdentityProvider;

/// Internal cause of a rejection.
///
/// Only used for diagnostics; callers always see a plain 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingCredential,
    MalformedCredential,
    ProviderRejected,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::MalformedCredential => "malformed_credential",
            Self::ProviderRejected => "provider_rejected",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    Authenticated(Identity),
    Rejected(RejectReason),
}

impl VerificationOutcome {
    pub fn into_result(self) -> Result<Identity, RejectReason> {
        match self {
            Self::Authenticated(identity) => Ok(identity),
            Self::Rejected(reason) => Err(reason),
        }
    }
}

#[derive(Clone)]
pub struct AuthGate {
    provider: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl AuthGate {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub async fn verify<R>(&self, req: &R) -> VerificationOutcome
    where
        R: HeaderSource + ?Sized,
    {
        let token = match bearer_token(req) {
            Ok(token) => token,
            Err(reason) => {
                tracing::warn!(reason = %reason, "bearer credential rejected");
                return VerificationOutcome::Rejected(reason);
            }
        };

        match self.provider.lookup_identity(token).await {
            Ok(identity) => {
                tracing::debug!(user_id = %identity.user_id, "bearer credential accepted");
                VerificationOutcome::Authenticated(identity)
            }
            Err(err) => {
                tracing::warn!(
                    reason = %RejectReason::ProviderRejected,
                    provider = self.provider.name(),
                    error = %err,
                    "identity lookup failed"
                );
                VerificationOutcome::Rejected(RejectReason::ProviderRejected)
            }
        }
    }

    /// Same as [`AuthGate::verify`], shaped for `?` at the request boundary.
    pub async fn authenticate<R>(&self, req: &R) -> Result<Identity, RejectReason>
    where
        R: HeaderSource + ?Sized,
    {
        self.verify(req).await.into_result()
    }
}
