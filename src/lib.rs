//! # Portal (Server-side Login Gateway)
//!
//! `portal` sits between the login form and the authentication backend. It
//! validates submitted credentials, exchanges them with the backend, issues the
//! `auth-token` session cookie and redirects the caller.
//!
//! ## Login flow
//!
//! Every submission runs the same sequence: validate the form, exchange the
//! credentials with the backend (a single attempt, never retried), build the
//! session cookie and resolve the post-login redirect. Each step returns an
//! explicit [`api::Step`] so the handler inspects a tag instead of relying on
//! early exits.
//!
//! ## Redirects
//!
//! The `redirect` query parameter is untrusted. Only paths confined to the
//! configured public origin are honored; anything else (absolute URLs,
//! protocol-relative `//host` values) falls back to `/dashboard`.
//!
//! ## Failures
//!
//! Validation, credential and transport failures are all answered with the same
//! JSON shape carrying the submitted email and `rememberMe`. The password is
//! never logged or echoed back.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
