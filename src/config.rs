/*
 * Responsibility
 * - Load process configuration from the environment once at startup
 *   (listen address, database, CORS, identity-provider settings).
 * - Fail startup loudly on missing/invalid values.
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
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

#[derive(Debug)]
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

pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    /// Identity-provider tenant domain. The issuer and the JWKS endpoint
    /// are derived from it; see `issuer()` and `jwks_url()`.
    pub auth0_domain: String,
    pub api_audience: String,
    pub auth_algorithms: Vec<String>,
    pub access_token_leeway_seconds: u64,

    /// Overrides the derived well-known JWKS URL. Meant for deployments
    /// that front the provider with a proxy, and for tests.
    pub jwks_url_override: Option<String>,
    pub jwks_cache_ttl: Duration,
    pub jwks_fetch_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let auth0_domain =
            std::env::var("AUTH0_DOMAIN").map_err(|_| ConfigError::Missing("AUTH0_DOMAIN"))?;
        if auth0_domain.trim().is_empty() {
            return Err(ConfigError::Invalid("AUTH0_DOMAIN"));
        }

        let api_audience =
            std::env::var("API_AUDIENCE").map_err(|_| ConfigError::Missing("API_AUDIENCE"))?;

        let auth_algorithms = std::env::var("ALGORITHMS")
            .unwrap_or_else(|_| "RS256".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        if auth_algorithms.is_empty() {
            return Err(ConfigError::Invalid("ALGORITHMS"));
        }

        let access_token_leeway_seconds = std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let jwks_url_override = std::env::var("JWKS_URL").ok().filter(|s| !s.is_empty());

        let jwks_cache_ttl = Duration::from_secs(
            std::env::var("JWKS_CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(300),
        );

        let jwks_fetch_timeout = Duration::from_secs(
            std::env::var("JWKS_FETCH_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        );

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            auth0_domain,
            api_audience,
            auth_algorithms,
            access_token_leeway_seconds,
            jwks_url_override,
            jwks_cache_ttl,
            jwks_fetch_timeout,
        })
    }

    /// Expected `iss` claim: the tenant domain with the scheme and the
    /// trailing slash the provider puts on it.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.auth0_domain)
    }

    pub fn jwks_url(&self) -> String {
        self.jwks_url_override.clone().unwrap_or_else(|| {
            format!("https://{}/.well-known/jwks.json", self.auth0_domain)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_domain(domain: &str) -> Config {
        Config {
            addr: "0.0.0.0:3000".parse().unwrap(),
            database_url: "postgres://localhost/drinks".to_string(),
            app_env: AppEnv::Development,
            cors_allowed_origins: vec![],
            auth0_domain: domain.to_string(),
            api_audience: "drinks".to_string(),
            auth_algorithms: vec!["RS256".to_string()],
            access_token_leeway_seconds: 0,
            jwks_url_override: None,
            jwks_cache_ttl: Duration::from_secs(300),
            jwks_fetch_timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn issuer_carries_scheme_and_trailing_slash() {
        let config = config_with_domain("tenant.eu.auth0.com");
        assert_eq!(config.issuer(), "https://tenant.eu.auth0.com/");
    }

    #[test]
    fn jwks_url_is_derived_unless_overridden() {
        let mut config = config_with_domain("tenant.eu.auth0.com");
        assert_eq!(
            config.jwks_url(),
            "https://tenant.eu.auth0.com/.well-known/jwks.json"
        );

        config.jwks_url_override = Some("http://127.0.0.1:9999/keys".to_string());
        assert_eq!(config.jwks_url(), "http://127.0.0.1:9999/keys");
    }
}
