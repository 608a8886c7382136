// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Token Module
//!
//! Stateless issuance and validation of HS256 access and refresh tokens.
//!
//! ## Key Material
//!
//! One deployment secret is expanded with HKDF-SHA256 into two independent
//! 32-byte keys: one signs access tokens, the other signs refresh tokens. A
//! token of one class therefore never verifies as the other, and tokens from
//! a manager with a different secret never verify at all.
//!
//! ## Token Lifecycle
//!
//! ```text
//! Issued -> Valid (nbf <= now < exp) -> Expired (now >= exp)
//! ```
//!
//! There is no revoked state. `exchange_refresh_token` rotates the pair: the
//! new refresh token carries a fresh `jti`, the presented one stays
//! cryptographically valid until it expires. Callers needing single-use
//! refresh tokens must track consumed `jti` values themselves.
//!
//! ## Wire Format
//!
//! Compact JWS: `base64url(header).base64url(payload).base64url(signature)`,
//! header `{"alg":"HS256","typ":"JWT"}`, payload fields `user_id`,
//! `username`, `email`, `roles`, `custom_claims`, `iss`, `sub`, `exp`, `iat`,
//! `nbf` and, on refresh tokens, `jti`.

pub mod claims;
pub mod error;
pub mod keys;
pub mod manager;

pub use claims::{AccessClaims, ClaimSet, CustomClaims, RefreshClaims};
pub use error::TokenError;
pub use keys::{derive_key_pair, KeyPair};
pub use manager::{TokenManager, TokenPair, BEARER_TOKEN_TYPE, DEFAULT_REFRESH_TTL, MAX_TTL};
