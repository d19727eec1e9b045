//! Local identity verification for HS256 access tokens.
//!
//! Supabase signs user access tokens with the project JWT secret, so a
//! deployment holding that secret can verify tokens without a network call.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};

use crate::services::auth::identity::Identity;
use crate::services::auth::provider::{IdentityProvider, ProviderError};

#[derive(Clone)]
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtIdentityProvider")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtIdentityProvider {
    pub fn new(secret: &str, audience: &str, leeway_seconds: u64) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);
        validation.leeway = leeway_seconds;

        Self {
            decoding_key,
            validation,
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn lookup_identity(&self, token: &str) -> Result<Identity, ProviderError> {
        let data =
            jsonwebtoken::decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)?;

        let mut claims = data.claims;
        let user_id = match claims.remove("sub") {
            Some(Value::String(sub)) if !sub.trim().is_empty() => sub,
            _ => return Err(ProviderError::InvalidResponse("missing 'sub' claim".into())),
        };

        Ok(Identity { user_id, claims })
    }

    fn name(&self) -> &'static str {
        "jwt"
    }
}
