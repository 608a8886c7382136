// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated requests.
//!
//! Use the `Auth` extractor in handlers to require a valid access token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims is AccessClaims
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{bearer::bearer_from_headers, AuthError};
use crate::state::AppState;
use crate::token::AccessClaims;

/// Extractor for authenticated users.
///
/// Validates the bearer token from the `Authorization` header against the
/// access key held by the application's `TokenManager`. Claims already
/// placed in request extensions by the auth middleware are reused.
pub struct Auth(pub AccessClaims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already validated the token
        if let Some(claims) = parts.extensions.get::<AccessClaims>().cloned() {
            return Ok(Auth(claims));
        }

        let token = bearer_from_headers(&parts.headers)?;
        let claims = state.tokens.validate_token(token)?;

        Ok(Auth(claims))
    }
}

/// Optional authentication extractor.
///
/// Returns `None` if no valid authentication is present, instead of rejecting.
pub struct OptionalAuth(pub Option<AccessClaims>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Try to authenticate, but don't fail if it doesn't work
        match Auth::from_request_parts(parts, state).await {
            Ok(Auth(claims)) => Ok(OptionalAuth(Some(claims))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}
