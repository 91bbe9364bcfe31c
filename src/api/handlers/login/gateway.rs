//! The login gateway: validate, exchange, establish the session, redirect.
//!
//! Every step returns a [`Step`]; the gateway inspects the tag and either moves
//! on or stops with a terminal [`Outcome`]. Nothing here touches the transport;
//! handlers turn the outcome into an HTTP response.
//!
//! ```text
//! Idle -> Validating -> {FieldValidation | Exchanging}
//!      -> {TransportError | InvalidCredentials | Establishing} -> Redirecting
//! Idle -> Redirecting   (entry guard, session already present)
//! ```

use axum::http::HeaderMap;
use std::{fmt, sync::Arc};
use tracing::{debug, info};

use super::{
    error::{ExchangeError, LoginError, LoginFailure},
    exchange::{AuthBackend, AuthResult, HttpAuthBackend},
    redirect::{RedirectGuard, RedirectTarget},
    session::{
        cookie_value, valid_cookie_value, SessionCookie, CSRF_COOKIE_NAME, SESSION_COOKIE_NAME,
    },
    state::GatewayConfig,
    types::{LoginForm, LoginRequest},
    validation,
};
use secrecy::{ExposeSecret, SecretString};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    FieldValidation,
    Exchanging,
    TransportError,
    InvalidCredentials,
    Establishing,
    Redirecting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::FieldValidation => "field_validation",
            Self::Exchanging => "exchanging",
            Self::TransportError => "transport_error",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Establishing => "establishing",
            Self::Redirecting => "redirecting",
        };
        f.write_str(name)
    }
}

/// Where to send the caller, plus the session cookie when one was just issued.
#[derive(Debug)]
pub struct Redirect {
    pub location: RedirectTarget,
    pub cookie: Option<SessionCookie>,
}

/// Result of a single gateway step.
#[derive(Debug)]
pub enum Step<T> {
    Continue(T),
    Redirect(Redirect),
    Fail(LoginFailure),
}

impl<T> Step<T> {
    /// Split into the value to continue with, or the terminal outcome to stop at.
    ///
    /// # Errors
    /// Returns the terminal [`Outcome`] for `Redirect` and `Fail`.
    pub fn branch(self) -> Result<T, Outcome> {
        match self {
            Self::Continue(value) => Ok(value),
            Self::Redirect(redirect) => Err(Outcome::Redirect(redirect)),
            Self::Fail(failure) => Err(Outcome::Fail(failure)),
        }
    }
}

/// Terminal result of `load` or `submit`.
#[derive(Debug)]
pub enum Outcome {
    /// No session yet; show the login form.
    RenderForm,
    Redirect(Redirect),
    Fail(LoginFailure),
}

impl Outcome {
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::RenderForm => Phase::Idle,
            Self::Redirect(_) => Phase::Redirecting,
            Self::Fail(failure) => match failure.error {
                LoginError::FieldValidation(_) => Phase::FieldValidation,
                LoginError::InvalidCredentials(_) => Phase::InvalidCredentials,
                LoginError::Transport(_) => Phase::TransportError,
            },
        }
    }
}

/// Request data the gateway needs, lifted out of the transport.
#[derive(Default)]
pub struct LoginContext {
    session_token: Option<String>,
    csrf_token: Option<String>,
    redirect: Option<String>,
}

impl LoginContext {
    #[must_use]
    pub fn new(
        session_token: Option<String>,
        csrf_token: Option<String>,
        redirect: Option<String>,
    ) -> Self {
        Self {
            session_token,
            csrf_token,
            redirect,
        }
    }

    #[must_use]
    pub fn from_headers(headers: &HeaderMap, redirect: Option<String>) -> Self {
        Self::new(
            cookie_value(headers, SESSION_COOKIE_NAME),
            cookie_value(headers, CSRF_COOKIE_NAME),
            redirect,
        )
    }

    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }

    /// Anti-forgery token forwarded to the backend, empty when the cookie is absent.
    #[must_use]
    pub fn csrf_token(&self) -> &str {
        self.csrf_token.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }
}

impl fmt::Debug for LoginContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginContext")
            .field("has_session", &self.has_session())
            .field("has_csrf_token", &self.csrf_token.is_some())
            .field("redirect", &self.redirect)
            .finish()
    }
}

/// Request-scoped login flow. Holds no per-request state, so one instance serves
/// all concurrent requests.
pub struct Gateway {
    config: GatewayConfig,
    backend: Arc<dyn AuthBackend>,
    guard: RedirectGuard,
}

impl Gateway {
    #[must_use]
    pub fn new(config: GatewayConfig, backend: Arc<dyn AuthBackend>) -> Self {
        let guard = RedirectGuard::new(config.public_origin().clone());
        Self {
            config,
            backend,
            guard,
        }
    }

    /// Build a gateway talking to the configured HTTP backend.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: GatewayConfig) -> anyhow::Result<Self> {
        let backend = HttpAuthBackend::new(config.auth_backend_url(), config.auth_timeout())?;
        Ok(Self::new(config, Arc::new(backend)))
    }

    /// Initial page render: skip the form when the caller already has a session.
    pub fn load(&self, context: &LoginContext) -> Outcome {
        match self.entry_guard(context).branch() {
            Ok(()) => Outcome::RenderForm,
            Err(outcome) => outcome,
        }
    }

    /// Form submission: validate, exchange, establish the session, redirect.
    pub async fn submit(&self, context: &LoginContext, form: LoginForm) -> Outcome {
        let outcome = match self.run_submit(context, form).await {
            Ok(outcome) | Err(outcome) => outcome,
        };
        debug!(phase = %outcome.phase(), "login submission finished");
        outcome
    }

    async fn run_submit(&self, context: &LoginContext, form: LoginForm) -> Result<Outcome, Outcome> {
        debug!(phase = %Phase::Validating, "login phase");
        let request = validation::validate(form).branch()?;

        debug!(phase = %Phase::Exchanging, "login phase");
        let token = self.exchange(&request, context.csrf_token()).await.branch()?;

        debug!(phase = %Phase::Establishing, "login phase");
        let cookie = self.establish(&request, token).branch()?;

        info!("login succeeded");
        Ok(Outcome::Redirect(self.exit_guard(context, Some(cookie))))
    }

    fn entry_guard(&self, context: &LoginContext) -> Step<()> {
        if context.has_session() {
            debug!(phase = %Phase::Redirecting, "session already present");
            Step::Redirect(self.exit_guard(context, None))
        } else {
            Step::Continue(())
        }
    }

    fn exit_guard(&self, context: &LoginContext, cookie: Option<SessionCookie>) -> Redirect {
        Redirect {
            location: self.guard.resolve(context.redirect()),
            cookie,
        }
    }

    /// Single attempt against the backend; failures are surfaced, never retried.
    async fn exchange(&self, request: &LoginRequest, csrf_token: &str) -> Step<SecretString> {
        if csrf_token.is_empty() {
            debug!("no {CSRF_COOKIE_NAME} cookie, forwarding empty token");
        }

        match self.backend.login(request, csrf_token).await {
            Ok(AuthResult::Success { token }) => Step::Continue(token),
            Ok(AuthResult::Failure { status, message }) => {
                debug!("auth backend rejected credentials with {status}");
                Step::Fail(failure(request, LoginError::InvalidCredentials(message)))
            }
            Err(err) => Step::Fail(failure(request, LoginError::Transport(err))),
        }
    }

    /// No cookie leaves the gateway unless the token is a plain cookie value.
    fn establish(&self, request: &LoginRequest, token: SecretString) -> Step<SessionCookie> {
        if !valid_cookie_value(token.expose_secret()) {
            return Step::Fail(failure(
                request,
                LoginError::Transport(ExchangeError::MalformedResponse(
                    "token is not a valid cookie value".to_string(),
                )),
            ));
        }

        Step::Continue(SessionCookie::new(
            token,
            request.remember_me,
            self.config.session_cookie_secure(),
        ))
    }
}

fn failure(request: &LoginRequest, error: LoginError) -> LoginFailure {
    LoginFailure::new(error, Some(request.email.clone()), request.remember_me)
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("config", &self.config)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}
