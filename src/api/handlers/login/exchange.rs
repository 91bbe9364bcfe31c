//! Credential exchange with the remote authentication backend.

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::{fmt, future::Future, pin::Pin, time::Duration};
use tracing::{debug, instrument};
use url::Url;

use super::{
    error::{ExchangeError, INVALID_CREDENTIALS_MESSAGE},
    types::{BackendLoginRequest, BackendLoginResponse, LoginRequest},
};
use crate::APP_USER_AGENT;

pub const CSRF_HEADER_NAME: &str = "X-CSRF-Token";
pub const BACKEND_LOGIN_PATH: &str = "/auth/login";

/// Outcome of a completed exchange. Transport problems are reported separately as
/// [`ExchangeError`].
pub enum AuthResult {
    Success { token: SecretString },
    Failure { status: StatusCode, message: String },
}

impl fmt::Debug for AuthResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { .. } => f.debug_struct("Success").field("token", &"***").finish(),
            Self::Failure { status, message } => f
                .debug_struct("Failure")
                .field("status", status)
                .field("message", message)
                .finish(),
        }
    }
}

pub type ExchangeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<AuthResult, ExchangeError>> + Send + 'a>>;

/// Anything able to verify credentials. Implementations must issue exactly one
/// attempt per call and never retry on their own.
pub trait AuthBackend: Send + Sync {
    fn login<'a>(&'a self, request: &'a LoginRequest, csrf_token: &'a str) -> ExchangeFuture<'a>;
}

/// HTTP client for `POST {backend}/auth/login`.
#[derive(Clone, Debug)]
pub struct HttpAuthBackend {
    client: Client,
    login_url: Url,
}

impl HttpAuthBackend {
    /// Build a client for the given backend base URL.
    ///
    /// # Errors
    /// Returns an error if the login URL cannot be derived or the HTTP client fails to build.
    pub fn new(base_url: &Url, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            login_url: login_url(base_url)?,
        })
    }

    #[must_use]
    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    #[instrument(skip_all, fields(url = %self.login_url))]
    async fn exchange(
        &self,
        request: &LoginRequest,
        csrf_token: &str,
    ) -> Result<AuthResult, ExchangeError> {
        let body = BackendLoginRequest {
            email: &request.email,
            password: request.password.expose_secret(),
            remember_me: request.remember_me,
        };

        let response = self
            .client
            .post(self.login_url.clone())
            .header(CSRF_HEADER_NAME, csrf_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        debug!("auth backend responded with {status}");

        if status.is_success() {
            let payload: BackendLoginResponse = response.json().await.map_err(|err| {
                ExchangeError::MalformedResponse(format!("invalid success body: {err}"))
            })?;

            return match payload.token.filter(|token| !token.is_empty()) {
                Some(token) => Ok(AuthResult::Success {
                    token: SecretString::from(token),
                }),
                None => Err(ExchangeError::MalformedResponse(
                    "success body without token".to_string(),
                )),
            };
        }

        // The status alone decides failure; an unreadable body only loses the message.
        let message = response
            .json::<BackendLoginResponse>()
            .await
            .ok()
            .and_then(|payload| payload.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| INVALID_CREDENTIALS_MESSAGE.to_string());

        Ok(AuthResult::Failure { status, message })
    }
}

impl AuthBackend for HttpAuthBackend {
    fn login<'a>(&'a self, request: &'a LoginRequest, csrf_token: &'a str) -> ExchangeFuture<'a> {
        Box::pin(self.exchange(request, csrf_token))
    }
}

fn login_url(base_url: &Url) -> anyhow::Result<Url> {
    let base = base_url.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{base}{BACKEND_LOGIN_PATH}"))?)
}
