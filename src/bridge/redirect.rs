//! Redirect follow policy.

use crate::http::request::is_secure_scheme;
use serde::Deserialize;
use url::Url;

/// Most redirects followed for one original request; the next one is canceled.
pub const MAX_FOLLOW_COUNT: u32 = 20;

/// Redirect flags supplied by the surrounding client configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RedirectPolicy {
    /// Follow redirects that keep the scheme.
    pub follow_redirects: bool,
    /// Follow redirects that switch between secure and insecure schemes.
    pub follow_ssl_redirects: bool,
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self {
            follow_redirects: true,
            follow_ssl_redirects: true,
        }
    }
}

impl RedirectPolicy {
    /// A policy that never follows.
    pub fn none() -> Self {
        Self {
            follow_redirects: false,
            follow_ssl_redirects: false,
        }
    }

    /// Decide for a redirect from `original` to `new_location`.
    pub fn decide_for(&self, original: &Url, new_location: &str) -> RedirectDecision {
        decide(
            is_secure_scheme(original.scheme()),
            location_is_secure(new_location),
            self.follow_redirects,
            self.follow_ssl_redirects,
        )
    }
}

/// Outcome of a redirect decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectDecision {
    Follow,
    Cancel,
}

/// Follow or cancel one redirect.
///
/// A scheme change in either direction is governed by `follow_ssl_redirects`,
/// a same-scheme redirect by `follow_redirects`. The follow-count cap is
/// applied by the caller and overrides this decision.
pub fn decide(
    original_is_secure: bool,
    new_location_is_secure: bool,
    follow_redirects: bool,
    follow_ssl_redirects: bool,
) -> RedirectDecision {
    let follow = if original_is_secure != new_location_is_secure {
        follow_ssl_redirects
    } else {
        follow_redirects
    };
    if follow {
        RedirectDecision::Follow
    } else {
        RedirectDecision::Cancel
    }
}

fn location_is_secure(location: &str) -> bool {
    match Url::parse(location) {
        Ok(url) => is_secure_scheme(url.scheme()),
        Err(_) => location
            .get(..8)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("https://")),
    }
}
