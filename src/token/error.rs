// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token errors.

use jsonwebtoken::errors::ErrorKind;

/// Errors produced while deriving keys, issuing or validating tokens.
///
/// The validation kinds are deliberately coarse. Callers should use them to
/// decide whether a refresh flow is appropriate ([`TokenError::is_expired`])
/// and surface a generic "unauthorized" to external clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Access token is malformed, tampered with, or signed with another key.
    #[error("invalid token")]
    InvalidToken,

    /// Access token signature is valid but the token has expired.
    #[error("token has expired")]
    TokenExpired,

    /// Access token is correctly signed but its payload is not an access claims set.
    #[error("invalid token claims")]
    InvalidClaims,

    /// Refresh token is malformed, tampered with, or signed with another key.
    #[error("invalid refresh token")]
    InvalidRefreshToken,

    /// Refresh token signature is valid but the refresh window has elapsed.
    #[error("refresh token has expired")]
    RefreshTokenExpired,

    /// Key derivation rejected its parameters.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// A token lifetime cannot be represented as a timestamp offset.
    #[error("token duration is out of range")]
    InvalidDuration,

    /// The signing backend failed to produce a token.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// Whether the failure is an expiry, i.e. a refresh flow may recover it.
    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::TokenExpired | TokenError::RefreshTokenExpired)
    }

    /// Map a decoding failure on the access-token path.
    pub(crate) fn from_access_decode(kind: &ErrorKind) -> Self {
        match kind {
            ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => TokenError::InvalidClaims,
            _ => TokenError::InvalidToken,
        }
    }

    /// Map a decoding failure on the refresh-token path.
    ///
    /// Shape failures collapse into `InvalidRefreshToken`; a refresh token is
    /// either usable or it is not.
    pub(crate) fn from_refresh_decode(kind: &ErrorKind) -> Self {
        match kind {
            ErrorKind::ExpiredSignature => TokenError::RefreshTokenExpired,
            _ => TokenError::InvalidRefreshToken,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_expiry_kinds_are_recoverable() {
        assert!(TokenError::TokenExpired.is_expired());
        assert!(TokenError::RefreshTokenExpired.is_expired());
        assert!(!TokenError::InvalidToken.is_expired());
        assert!(!TokenError::InvalidClaims.is_expired());
        assert!(!TokenError::InvalidRefreshToken.is_expired());
    }

    #[test]
    fn access_decode_mapping() {
        assert_eq!(
            TokenError::from_access_decode(&ErrorKind::InvalidSignature),
            TokenError::InvalidToken
        );
        assert_eq!(
            TokenError::from_access_decode(&ErrorKind::InvalidAlgorithm),
            TokenError::InvalidToken
        );
        assert_eq!(
            TokenError::from_access_decode(&ErrorKind::ExpiredSignature),
            TokenError::TokenExpired
        );
        assert_eq!(
            TokenError::from_access_decode(&ErrorKind::MissingRequiredClaim("exp".into())),
            TokenError::InvalidClaims
        );
    }

    #[test]
    fn refresh_decode_mapping() {
        assert_eq!(
            TokenError::from_refresh_decode(&ErrorKind::InvalidSignature),
            TokenError::InvalidRefreshToken
        );
        assert_eq!(
            TokenError::from_refresh_decode(&ErrorKind::ExpiredSignature),
            TokenError::RefreshTokenExpired
        );
    }
}
