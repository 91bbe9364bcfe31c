//! Gateway configuration.

use std::{fmt, str::FromStr, time::Duration};
use url::Url;

const DEFAULT_AUTH_TIMEOUT_SECONDS: u64 = 10;

/// Deployment mode; only production issues `Secure` cookies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "invalid environment '{other}', expected 'development' or 'production'"
            )),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    auth_backend_url: Url,
    public_origin: Url,
    environment: Environment,
    auth_timeout_seconds: u64,
}

impl GatewayConfig {
    #[must_use]
    pub fn new(auth_backend_url: Url, public_origin: Url) -> Self {
        Self {
            auth_backend_url,
            public_origin,
            environment: Environment::default(),
            auth_timeout_seconds: DEFAULT_AUTH_TIMEOUT_SECONDS,
        }
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn with_auth_timeout_seconds(mut self, seconds: u64) -> Self {
        self.auth_timeout_seconds = seconds;
        self
    }

    #[must_use]
    pub fn auth_backend_url(&self) -> &Url {
        &self.auth_backend_url
    }

    #[must_use]
    pub fn public_origin(&self) -> &Url {
        &self.public_origin
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    #[must_use]
    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_seconds)
    }

    /// Session cookies carry `Secure` only in production.
    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.environment.is_production()
    }
}
