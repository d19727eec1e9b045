pub mod credential;
pub mod factory;
pub mod gate;
pub mod identity;
pub mod jwt;
pub mod provider;
pub mod supabase;

pub use credential::HeaderSource;
pub use factory::build_auth_gate;
pub use gate::{AuthGate, RejectReason, VerificationOutcome};
pub use identity::Identity;
pub use jwt::JwtIdentityProvider;
pub use provider::{IdentityProvider, ProviderError};
pub use supabase::SupabaseIdentityProvider;
