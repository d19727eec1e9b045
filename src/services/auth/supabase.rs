//! Remote identity lookup against a Supabase (GoTrue) auth server.
//!
//! `GET {base}/auth/v1/user` with the service key in `apikey` and the user's
//! token as the bearer credential. The server answers with the user record.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use url::Url;

use crate::services::auth::identity::Identity;
use crate::services::auth::provider::{IdentityProvider, ProviderError};

const USER_PATH: &str = "auth/v1/user";

#[derive(Clone)]
pub struct SupabaseIdentityProvider {
    http: reqwest::Client,
    user_url: Url,
    service_key: String,
}

impl std::fmt::Debug for SupabaseIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the service key
        f.debug_struct("SupabaseIdentityProvider")
            .field("user_url", &self.user_url.as_str())
            .finish()
    }
}

impl SupabaseIdentityProvider {
    pub fn new(
        base_url: &Url,
        service_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(http, base_url, service_key)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: &Url,
        service_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let user_url = with_trailing_slash(base_url)
            .join(USER_PATH)
            .map_err(|e| ProviderError::Configuration(format!("invalid provider url: {e}")))?;

        Ok(Self {
            http,
            user_url,
            service_key: service_key.into(),
        })
    }
}

fn with_trailing_slash(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn lookup_identity(&self, token: &str) -> Result<Identity, ProviderError> {
        let res = self
            .http
            .get(self.user_url.clone())
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = res.status();
        if status.is_client_error() {
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::Unavailable {
                status: status.as_u16(),
            });
        }

        let identity: Identity = res
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if identity.user_id.trim().is_empty() {
            return Err(ProviderError::InvalidResponse("empty user id".into()));
        }

        Ok(identity)
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}
