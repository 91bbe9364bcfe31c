//! Redirect guard for the untrusted `redirect` query parameter.
//!
//! A login link can carry `?redirect=...` so the user lands back where they
//! started. Honoring arbitrary values turns the login page into an open
//! redirect: an attacker could send an authenticated victim to an external
//! site. Only paths that stay on the configured public origin are accepted.

use std::fmt;
use url::{Position, Url};

pub const DEFAULT_REDIRECT: &str = "/dashboard";

/// A validated same-origin path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectTarget(String);

impl RedirectTarget {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RedirectTarget {
    fn default() -> Self {
        Self(DEFAULT_REDIRECT.to_string())
    }
}

impl fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pure and deterministic: the same candidate and origin always resolve to the same target.
#[derive(Clone, Debug)]
pub struct RedirectGuard {
    origin: Url,
}

impl RedirectGuard {
    #[must_use]
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    /// Resolve the post-login destination, falling back to `/dashboard`.
    #[must_use]
    pub fn resolve(&self, candidate: Option<&str>) -> RedirectTarget {
        candidate
            .and_then(|value| self.confine(value))
            .unwrap_or_default()
    }

    fn confine(&self, candidate: &str) -> Option<RedirectTarget> {
        if !candidate.starts_with('/') || candidate.starts_with("//") {
            return None;
        }

        // Browsers treat `\` like `/` and drop tabs/newlines, so `/\evil.com`
        // or `/\t/evil.com` would become protocol-relative.
        if candidate.chars().any(|c| c == '\\' || c.is_control()) {
            return None;
        }

        let resolved = self.origin.join(candidate).ok()?;
        if resolved.origin() != self.origin.origin() {
            return None;
        }

        if candidate.is_ascii() {
            Some(RedirectTarget(candidate.to_string()))
        } else {
            // Percent-encoded form so the value fits in a `Location` header.
            Some(RedirectTarget(resolved[Position::BeforePath..].to_string()))
        }
    }
}
