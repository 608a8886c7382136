// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction from `Authorization` header values.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::AuthError;

/// Case-sensitive scheme prefix.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Return the token following the `Bearer ` prefix, unmodified.
///
/// # Errors
///
/// `MissingAuthHeader` for an empty value, `InvalidAuthHeader` when the
/// prefix is absent or nothing follows it.
pub fn extract_bearer_token(header_value: &str) -> Result<&str, AuthError> {
    if header_value.is_empty() {
        return Err(AuthError::MissingAuthHeader);
    }

    let token = header_value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Extract the bearer token from request headers.
pub fn bearer_from_headers(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;
    extract_bearer_token(value)
}
