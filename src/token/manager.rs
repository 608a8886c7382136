// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance, validation and refresh rotation.

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::claims::{
    promoted_identity, AccessClaims, CustomClaims, RefreshClaims, EMAIL_CLAIM, USERNAME_CLAIM,
};
use super::keys::derive_default_key_pair;
use super::TokenError;

/// Refresh token lifetime when none is configured (7 days).
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Longest accepted token lifetime (100 years).
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// `token_type` reported in every [`TokenPair`].
pub const BEARER_TOKEN_TYPE: &str = "Bearer";

/// An access token and its refresh token, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    /// Short-lived bearer token for API requests.
    pub access_token: String,
    /// Long-lived token used only to obtain a new pair.
    pub refresh_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// Issues and validates access/refresh tokens.
///
/// Holds two keys derived from one secret, the token lifetimes and the
/// issuer. Immutable after construction; share it behind an `Arc` and call it
/// from any number of tasks.
#[derive(Clone)]
pub struct TokenManager {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    access_delta: TimeDelta,
    refresh_delta: TimeDelta,
    issuer: String,
    validation: Validation,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Create a manager with the default 7-day refresh lifetime.
    ///
    /// # Errors
    ///
    /// Fails if key derivation rejects the secret (e.g. it is empty) or the
    /// access lifetime exceeds [`MAX_TTL`].
    pub fn new(
        secret: &str,
        access_ttl: Duration,
        issuer: impl Into<String>,
    ) -> Result<Self, TokenError> {
        Self::with_refresh_ttl(secret, access_ttl, issuer, DEFAULT_REFRESH_TTL)
    }

    /// Create a manager with an explicit refresh lifetime.
    ///
    /// # Errors
    ///
    /// See [`TokenManager::new`].
    pub fn with_refresh_ttl(
        secret: &str,
        access_ttl: Duration,
        issuer: impl Into<String>,
        refresh_ttl: Duration,
    ) -> Result<Self, TokenError> {
        let keys = derive_default_key_pair(secret.as_bytes())?;
        let access_delta = lifetime(access_ttl)?;
        let refresh_delta = lifetime(refresh_ttl)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // Temporal claims are checked without leeway in `check_lifetime`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            access_encoding: EncodingKey::from_secret(keys.access_key()),
            access_decoding: DecodingKey::from_secret(keys.access_key()),
            refresh_encoding: EncodingKey::from_secret(keys.refresh_key()),
            refresh_decoding: DecodingKey::from_secret(keys.refresh_key()),
            access_ttl,
            refresh_ttl,
            access_delta,
            refresh_delta,
            issuer: issuer.into(),
            validation,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    // -------------------------------------------------------------------------
    // Claims construction
    // -------------------------------------------------------------------------

    /// Build fresh access claims stamped with the current time.
    ///
    /// String values under the reserved `username`/`email` keys of `custom`
    /// are copied into the named fields; the map itself is kept as given.
    pub fn new_access_claims(
        &self,
        user_id: &str,
        roles: impl IntoIterator<Item = impl Into<String>>,
        custom: Option<CustomClaims>,
    ) -> Result<AccessClaims, TokenError> {
        let (iat, exp) = stamp(self.access_delta)?;
        let custom = custom.filter(|claims| !claims.is_empty());
        let (username, email) = promoted_identity(custom.as_ref());

        Ok(AccessClaims {
            user_id: user_id.to_string(),
            username,
            email,
            roles: roles.into_iter().map(Into::into).collect(),
            custom_claims: custom,
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            exp: Some(exp),
            nbf: iat,
            iat,
        })
    }

    /// Build fresh refresh claims with a new unique token id.
    pub fn new_refresh_claims(
        &self,
        user_id: &str,
        roles: impl IntoIterator<Item = impl Into<String>>,
        custom: Option<CustomClaims>,
    ) -> Result<RefreshClaims, TokenError> {
        let (iat, exp) = stamp(self.refresh_delta)?;
        let custom = custom.filter(|claims| !claims.is_empty());
        let (username, email) = promoted_identity(custom.as_ref());

        Ok(RefreshClaims {
            user_id: user_id.to_string(),
            username,
            email,
            roles: roles.into_iter().map(Into::into).collect(),
            custom_claims: custom,
            token_id: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            exp: Some(exp),
            nbf: iat,
            iat,
        })
    }

    /// Sign access claims with the access key.
    pub fn sign_access_claims(&self, claims: &AccessClaims) -> Result<String, TokenError> {
        sign(claims, &self.access_encoding)
    }

    /// Sign refresh claims with the refresh key.
    pub fn sign_refresh_claims(&self, claims: &RefreshClaims) -> Result<String, TokenError> {
        sign(claims, &self.refresh_encoding)
    }

    // -------------------------------------------------------------------------
    // Access tokens
    // -------------------------------------------------------------------------

    pub fn generate_token(
        &self,
        user_id: &str,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<String, TokenError> {
        let claims = self.new_access_claims(user_id, roles, None)?;
        self.sign_access_claims(&claims)
    }

    pub fn generate_token_with_user_info(
        &self,
        user_id: &str,
        username: &str,
        email: &str,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<String, TokenError> {
        self.generate_token_with_claims(user_id, roles, user_info_claims(username, email))
    }

    pub fn generate_token_with_claims(
        &self,
        user_id: &str,
        roles: impl IntoIterator<Item = impl Into<String>>,
        custom: CustomClaims,
    ) -> Result<String, TokenError> {
        let claims = self.new_access_claims(user_id, roles, Some(custom))?;
        self.sign_access_claims(&claims)
    }

    // -------------------------------------------------------------------------
    // Token pairs
    // -------------------------------------------------------------------------

    pub fn generate_token_pair(
        &self,
        user_id: &str,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<TokenPair, TokenError> {
        self.issue_pair(user_id, collect_roles(roles), None)
    }

    pub fn generate_token_pair_with_user_info(
        &self,
        user_id: &str,
        username: &str,
        email: &str,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<TokenPair, TokenError> {
        self.issue_pair(
            user_id,
            collect_roles(roles),
            Some(user_info_claims(username, email)),
        )
    }

    pub fn generate_token_pair_with_claims(
        &self,
        user_id: &str,
        roles: impl IntoIterator<Item = impl Into<String>>,
        custom: CustomClaims,
    ) -> Result<TokenPair, TokenError> {
        self.issue_pair(user_id, collect_roles(roles), Some(custom))
    }

    fn issue_pair(
        &self,
        user_id: &str,
        roles: Vec<String>,
        custom: Option<CustomClaims>,
    ) -> Result<TokenPair, TokenError> {
        let access = self.new_access_claims(user_id, roles.iter().cloned(), custom.clone())?;
        let refresh = self.new_refresh_claims(user_id, roles, custom)?;

        let pair = TokenPair {
            access_token: self.sign_access_claims(&access)?,
            refresh_token: self.sign_refresh_claims(&refresh)?,
            token_type: BEARER_TOKEN_TYPE.to_string(),
            expires_in: self.access_ttl.as_secs(),
        };

        tracing::debug!(
            user_id = %user_id,
            token_id = %refresh.token_id,
            "Issued token pair"
        );
        Ok(pair)
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Verify an access token and return its claims.
    ///
    /// # Errors
    ///
    /// `TokenExpired` when only the expiry failed, `InvalidClaims` when a
    /// correctly signed payload has the wrong shape, `InvalidToken` for
    /// everything else (bad signature, foreign key, wrong algorithm, garbage).
    pub fn validate_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims: AccessClaims = self
            .decode_claims(token, &self.access_decoding)
            .map_err(|kind| TokenError::from_access_decode(&kind))?;

        match check_lifetime(claims.exp, claims.nbf) {
            LifetimeCheck::Valid => Ok(claims),
            LifetimeCheck::Expired => Err(TokenError::TokenExpired),
            LifetimeCheck::NotYetValid => Err(TokenError::InvalidToken),
        }
    }

    /// Verify a refresh token and return its claims.
    ///
    /// # Errors
    ///
    /// `RefreshTokenExpired` when the refresh window has elapsed,
    /// `InvalidRefreshToken` otherwise.
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let claims: RefreshClaims = self
            .decode_claims(token, &self.refresh_decoding)
            .map_err(|kind| TokenError::from_refresh_decode(&kind))?;

        match check_lifetime(claims.exp, claims.nbf) {
            LifetimeCheck::Valid => Ok(claims),
            LifetimeCheck::Expired => Err(TokenError::RefreshTokenExpired),
            LifetimeCheck::NotYetValid => Err(TokenError::InvalidRefreshToken),
        }
    }

    /// Verify the signature and deserialize the payload. Temporal claims are
    /// left to the caller.
    ///
    /// The header is parsed up front so that a malformed or unsupported header
    /// (e.g. `alg: none`) surfaces as `InvalidToken` rather than as a payload
    /// JSON error.
    fn decode_claims<T: DeserializeOwned>(
        &self,
        token: &str,
        key: &DecodingKey,
    ) -> Result<T, ErrorKind> {
        decode_header(token).map_err(|_| ErrorKind::InvalidToken)?;
        decode::<T>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| e.into_kind())
    }

    // -------------------------------------------------------------------------
    // Refresh
    // -------------------------------------------------------------------------

    /// Exchange a refresh token for a brand-new pair.
    ///
    /// Identity, roles and custom claims carry over; the new refresh token
    /// gets a new token id. The presented token is superseded, not revoked:
    /// it stays valid until its own expiry.
    ///
    /// # Errors
    ///
    /// `RefreshTokenExpired` or `InvalidRefreshToken` from validation.
    pub fn exchange_refresh_token(&self, refresh_token: &str) -> Result<TokenPair, TokenError> {
        let claims = self.validate_refresh_token(refresh_token)?;
        let custom = merge_identity(
            claims.custom_claims,
            claims.username.as_deref(),
            claims.email.as_deref(),
        );

        let pair = self.issue_pair(&claims.user_id, claims.roles, custom)?;
        tracing::info!(
            user_id = %claims.user_id,
            superseded_token_id = %claims.token_id,
            "Rotated refresh token"
        );
        Ok(pair)
    }

    /// Re-issue an access token from a possibly expired one.
    ///
    /// Only the signature is checked; expiry is ignored. This path never
    /// re-checks long-term authorization and exists for clients that predate
    /// refresh tokens. Prefer [`TokenManager::exchange_refresh_token`].
    ///
    /// # Errors
    ///
    /// `InvalidToken` or `InvalidClaims` from decoding.
    pub fn refresh_token(&self, access_token: &str) -> Result<String, TokenError> {
        let claims: AccessClaims = self
            .decode_claims(access_token, &self.access_decoding)
            .map_err(|kind| TokenError::from_access_decode(&kind))?;

        let custom = merge_identity(
            claims.custom_claims,
            claims.username.as_deref(),
            claims.email.as_deref(),
        );
        let refreshed = self.new_access_claims(&claims.user_id, claims.roles, custom)?;

        tracing::debug!(user_id = %claims.user_id, "Re-issued access token from legacy refresh");
        self.sign_access_claims(&refreshed)
    }
}

/// Outcome of the temporal checks on verified claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifetimeCheck {
    Valid,
    Expired,
    NotYetValid,
}

/// Valid while `nbf <= now < exp`.
fn check_lifetime(exp: Option<i64>, nbf: i64) -> LifetimeCheck {
    let now = Utc::now().timestamp();
    if exp.is_some_and(|exp| now >= exp) {
        LifetimeCheck::Expired
    } else if now < nbf {
        LifetimeCheck::NotYetValid
    } else {
        LifetimeCheck::Valid
    }
}

/// Bounded so that `now + ttl` stays representable for any issuance.
fn lifetime(ttl: Duration) -> Result<TimeDelta, TokenError> {
    if ttl > MAX_TTL {
        return Err(TokenError::InvalidDuration);
    }
    TimeDelta::from_std(ttl).map_err(|_| TokenError::InvalidDuration)
}

/// `(issued_at, expires_at)` Unix timestamps for a token issued now.
fn stamp(ttl: TimeDelta) -> Result<(i64, i64), TokenError> {
    let now = Utc::now();
    let exp = now
        .checked_add_signed(ttl)
        .ok_or(TokenError::InvalidDuration)?;
    Ok((now.timestamp(), exp.timestamp()))
}

fn sign<T: Serialize>(claims: &T, key: &EncodingKey) -> Result<String, TokenError> {
    encode(&Header::new(Algorithm::HS256), claims, key)
        .map_err(|e| TokenError::Signing(e.to_string()))
}

fn collect_roles(roles: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    roles.into_iter().map(Into::into).collect()
}

fn user_info_claims(username: &str, email: &str) -> CustomClaims {
    let mut custom = CustomClaims::new();
    if !username.is_empty() {
        custom.insert(USERNAME_CLAIM.to_string(), username.into());
    }
    if !email.is_empty() {
        custom.insert(EMAIL_CLAIM.to_string(), email.into());
    }
    custom
}

/// Put named identity fields back into the custom map so a re-issued token
/// promotes them again. Existing map entries win.
fn merge_identity(
    custom: Option<CustomClaims>,
    username: Option<&str>,
    email: Option<&str>,
) -> Option<CustomClaims> {
    let mut custom = custom.unwrap_or_default();
    for (key, value) in [(USERNAME_CLAIM, username), (EMAIL_CLAIM, email)] {
        if let Some(value) = value {
            custom
                .entry(key.to_string())
                .or_insert_with(|| value.into());
        }
    }
    Some(custom)
}
