// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Refresh-token transport over an `HttpOnly`, `SameSite=Strict` cookie.

use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Name of the refresh token cookie.
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// Cookie attributes that vary per deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshCookieConfig {
    /// Emit the `Secure` attribute (disable only for plain-HTTP development).
    pub secure: bool,
    /// Cookie `Max-Age`.
    pub max_age: Duration,
}

impl Default for RefreshCookieConfig {
    fn default() -> Self {
        Self {
            secure: true,
            max_age: crate::token::DEFAULT_REFRESH_TTL,
        }
    }
}

fn build_cookie(value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    let seconds = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
    Cookie::build((REFRESH_COOKIE_NAME, value))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .path("/")
        .max_age(time::Duration::seconds(seconds))
        .build()
}

/// Store `token` in the refresh cookie.
pub fn set_refresh_cookie(jar: CookieJar, token: &str, config: &RefreshCookieConfig) -> CookieJar {
    jar.add(build_cookie(token.to_owned(), config.max_age, config.secure))
}

/// Read the refresh token, if the cookie is present and non-empty.
pub fn read_refresh_cookie(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
}

/// Expire the refresh cookie on the client.
pub fn clear_refresh_cookie(jar: CookieJar, config: &RefreshCookieConfig) -> CookieJar {
    jar.add(build_cookie(String::new(), Duration::ZERO, config.secure))
}
