/// Factory: build the `AuthGate` (and its identity provider) from application `Config`.
use std::sync::Arc;

use crate::config::{Config, IdentityConfig};
use crate::services::auth::{
    AuthGate, IdentityProvider, JwtIdentityProvider, ProviderError, SupabaseIdentityProvider,
};

pub fn build_auth_gate(config: &Config) -> Result<Arc<AuthGate>, ProviderError> {
    let provider: Arc<dyn IdentityProvider> = match &config.identity {
        IdentityConfig::Remote {
            url,
            service_key,
            timeout,
        } => Arc::new(SupabaseIdentityProvider::new(
            url,
            service_key.clone(),
            *timeout,
        )?),
        IdentityConfig::Jwt {
            secret,
            audience,
            leeway_seconds,
        } => Arc::new(JwtIdentityProvider::new(secret, audience, *leeway_seconds)),
    };

    tracing::info!(provider = provider.name(), "identity provider configured");

    Ok(Arc::new(AuthGate::new(provider)))
}
