//! Process configuration read from the environment
//!
//! Binaries call `dotenv()` first, then [`AppConfig::from_env`]. Nothing here
//! fails: a missing key leaves the corresponding feature unconfigured.

use serde::{Deserialize, Serialize};

use crate::automation::AutomationConfig;
use crate::llm::service::ProviderSettings;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ENVIRONMENT: &str = "development";

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Listener settings and deployment label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read `SERVER_HOST`, `SERVER_PORT` and `ENVIRONMENT`; an unparsable
    /// port falls back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_value("SERVER_HOST").unwrap_or(defaults.host),
            port: env_value("SERVER_PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(defaults.port),
            environment: env_value("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }
}

/// Bearer-token verification keys.
///
/// With neither key set every authenticated route answers 401.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// RS256 public key in PEM form (`CLERK_JWT_KEY`)
    pub clerk_jwt_key: Option<String>,
    /// HS256 shared secret (`AUTH_JWT_SECRET`)
    pub jwt_secret: Option<String>,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            clerk_jwt_key: env_value("CLERK_JWT_KEY"),
            jwt_secret: env_value("AUTH_JWT_SECRET"),
        }
    }

    /// Shared-secret configuration, used by tests and local setups
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            clerk_jwt_key: None,
            jwt_secret: Some(secret.into()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.clerk_jwt_key.is_some() || self.jwt_secret.is_some()
    }
}

/// Backing stores reported by the health endpoint when configured
#[derive(Debug, Clone, Default)]
pub struct HealthTargets {
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
}

impl HealthTargets {
    pub fn from_env() -> Self {
        Self {
            database_url: env_value("DATABASE_URL"),
            redis_url: env_value("REDIS_URL"),
        }
    }
}

/// Everything a request handler may need
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub providers: ProviderSettings,
    pub automation: AutomationConfig,
    pub auth: AuthConfig,
    pub health: HealthTargets,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            providers: ProviderSettings::from_env(),
            automation: AutomationConfig::from_env(),
            auth: AuthConfig::from_env(),
            health: HealthTargets::from_env(),
        }
    }
}
