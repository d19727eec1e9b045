/*
 * Responsibility
 * - 環境変数の読み込み (PORT, CORS, identity provider, orchestrator)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// How bearer tokens are turned into identities.
#[derive(Clone, PartialEq, Eq)]
pub enum IdentityConfig {
    /// Ask the auth server for the user behind the token.
    Remote {
        url: Url,
        service_key: String,
        timeout: Duration,
    },
    /// Verify HS256 tokens locally with the project JWT secret.
    Jwt {
        secret: String,
        audience: String,
        leeway_seconds: u64,
    },
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print secrets
        match self {
            Self::Remote { url, timeout, .. } => f
                .debug_struct("Remote")
                .field("url", &url.as_str())
                .field("timeout", timeout)
                .finish(),
            Self::Jwt {
                audience,
                leeway_seconds,
                ..
            } => f
                .debug_struct("Jwt")
                .field("audience", audience)
                .field("leeway_seconds", leeway_seconds)
                .finish(),
        }
    }
}

#[derive(Clone)]
pub struct OrchestratorConfig {
    pub url: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for OrchestratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrchestratorConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub identity: IdentityConfig,
    pub orchestrator: OrchestratorConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup (env, map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let identity = match var("IDENTITY_PROVIDER")
            .unwrap_or_else(|| "remote".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "remote" | "supabase" => {
                let raw_url = var("SUPABASE_URL")
                    .or_else(|| var("NEXT_PUBLIC_SUPABASE_URL"))
                    .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
                let url = Url::parse(&raw_url).map_err(|_| ConfigError::Invalid("SUPABASE_URL"))?;

                let service_key = var("SUPABASE_SERVICE_ROLE")
                    .ok_or(ConfigError::Missing("SUPABASE_SERVICE_ROLE"))?;

                let timeout_secs = parse_or(&var, "IDENTITY_TIMEOUT_SECONDS", 10)?;

                IdentityConfig::Remote {
                    url,
                    service_key,
                    timeout: Duration::from_secs(timeout_secs),
                }
            }
            "jwt" => {
                let secret = var("SUPABASE_JWT_SECRET")
                    .ok_or(ConfigError::Missing("SUPABASE_JWT_SECRET"))?;
                let audience =
                    var("SUPABASE_JWT_AUDIENCE").unwrap_or_else(|| "authenticated".to_string());
                let leeway_seconds = parse_or(&var, "ACCESS_TOKEN_LEEWAY_SECONDS", 60)?;

                IdentityConfig::Jwt {
                    secret,
                    audience,
                    leeway_seconds,
                }
            }
            _ => return Err(ConfigError::Invalid("IDENTITY_PROVIDER")),
        };

        let orchestrator_url = var("LANGGRAPH_API_URL")
            .unwrap_or_else(|| "http://127.0.0.1:2024".to_string());
        let orchestrator = OrchestratorConfig {
            url: Url::parse(&orchestrator_url)
                .map_err(|_| ConfigError::Invalid("LANGGRAPH_API_URL"))?,
            api_key: var("LANGCHAIN_API_KEY"),
            timeout: Duration::from_secs(parse_or(&var, "ORCHESTRATOR_TIMEOUT_SECONDS", 300)?),
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            identity,
            orchestrator,
        })
    }
}

fn parse_or<F>(var: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
