// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::token::TokenError;

/// Authentication error type.
///
/// Rejections raised while authenticating a request. Token failures keep
/// their specific [`TokenError`] for logging and refresh decisions, but the
/// response body only ever says `unauthorized`.
#[derive(Debug)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Invalid authorization header format
    InvalidAuthHeader,
    /// Token failed validation
    InvalidToken(TokenError),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken(_) => "unauthorized",
        }
    }

    /// Get the HTTP status code for this error.
    ///
    /// Every authentication failure is a 401.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    /// Whether presenting a refresh token could recover from this error.
    pub fn is_expired(&self) -> bool {
        matches!(self, AuthError::InvalidToken(e) if e.is_expired())
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::InvalidToken(_) => write!(f, "Invalid or expired token"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::InvalidToken(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::InvalidToken(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::InvalidToken(kind) = &self {
            tracing::debug!(error = %kind, "Rejected bearer token");
        }

        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn token_failures_share_one_generic_body() {
        let mut bodies = Vec::new();
        for kind in [TokenError::TokenExpired, TokenError::InvalidToken, TokenError::InvalidClaims] {
            let response = AuthError::from(kind).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            bodies.push(bytes);
        }
        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));

        let body: serde_json::Value = serde_json::from_slice(&bodies[0]).unwrap();
        assert_eq!(body["error_code"], "unauthorized");
    }

    #[test]
    fn expiry_is_visible_internally() {
        assert!(AuthError::from(TokenError::TokenExpired).is_expired());
        assert!(!AuthError::from(TokenError::InvalidToken).is_expired());
        assert!(!AuthError::MissingAuthHeader.is_expired());
    }

    #[tokio::test]
    async fn header_failures_are_401_with_specific_codes() {
        for (error, code) in [
            (AuthError::MissingAuthHeader, "missing_auth_header"),
            (AuthError::InvalidAuthHeader, "invalid_auth_header"),
        ] {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["error_code"], code);
        }
    }
}
