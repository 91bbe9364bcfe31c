//! Gateway options: backend URL, public origin, environment and exchange timeout.

use crate::api::{Environment, GatewayConfig};
use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use thiserror::Error;
use url::Url;

pub const ARG_AUTH_BACKEND_URL: &str = "auth-backend-url";
pub const ARG_PUBLIC_ORIGIN: &str = "public-origin";
pub const ARG_ENVIRONMENT: &str = "environment";
pub const ARG_AUTH_TIMEOUT_SECONDS: &str = "auth-timeout-seconds";

/// Startup configuration problems; fatal before the server binds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("missing required argument: --{0}")]
    Missing(&'static str),
    #[error("invalid --{name} '{value}': {reason}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_AUTH_BACKEND_URL)
                .long(ARG_AUTH_BACKEND_URL)
                .help("Base URL of the authentication backend, e.g. http://localhost:3001")
                .env("PORTAL_AUTH_BACKEND_URL"),
        )
        .arg(
            Arg::new(ARG_PUBLIC_ORIGIN)
                .long(ARG_PUBLIC_ORIGIN)
                .help("Public origin of this site; post-login redirects are confined to it")
                .env("PORTAL_PUBLIC_ORIGIN")
                .default_value("http://localhost:8080"),
        )
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long(ARG_ENVIRONMENT)
                .help("Deployment environment: development or production (Secure cookies)")
                .env("PORTAL_ENVIRONMENT")
                .default_value("development")
                .value_parser(|value: &str| value.parse::<Environment>()),
        )
        .arg(
            Arg::new(ARG_AUTH_TIMEOUT_SECONDS)
                .long(ARG_AUTH_TIMEOUT_SECONDS)
                .help("Timeout in seconds for the credential exchange with the backend")
                .env("PORTAL_AUTH_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub auth_backend_url: Url,
    pub public_origin: Url,
    pub environment: Environment,
    pub auth_timeout_seconds: u64,
}

impl Options {
    /// Extract and validate gateway options.
    ///
    /// # Errors
    /// Returns a [`ConfigurationError`] when the backend URL is unset or either URL is invalid.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let auth_backend_url = matches
            .get_one::<String>(ARG_AUTH_BACKEND_URL)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigurationError::Missing(ARG_AUTH_BACKEND_URL))?;
        let auth_backend_url = http_url(ARG_AUTH_BACKEND_URL, auth_backend_url)?;

        let public_origin = matches
            .get_one::<String>(ARG_PUBLIC_ORIGIN)
            .ok_or(ConfigurationError::Missing(ARG_PUBLIC_ORIGIN))?;
        let public_origin = http_url(ARG_PUBLIC_ORIGIN, public_origin)?;

        let environment = matches
            .get_one::<Environment>(ARG_ENVIRONMENT)
            .copied()
            .unwrap_or_default();

        let auth_timeout_seconds = matches
            .get_one::<u64>(ARG_AUTH_TIMEOUT_SECONDS)
            .copied()
            .unwrap_or(10);

        Ok(Self {
            auth_backend_url,
            public_origin,
            environment,
            auth_timeout_seconds,
        })
    }

    #[must_use]
    pub fn into_config(self) -> GatewayConfig {
        GatewayConfig::new(self.auth_backend_url, self.public_origin)
            .with_environment(self.environment)
            .with_auth_timeout_seconds(self.auth_timeout_seconds)
    }
}

/// Absolute `http`/`https` URL with a host.
fn http_url(name: &'static str, value: &str) -> Result<Url, ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidUrl {
        name,
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value.trim()).map_err(|err| invalid(err.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url)
}
