// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! HTTP boundary of the token subsystem.
//!
//! ## Auth Flow
//!
//! 1. Client posts credentials to `/v1/auth/login` and receives a token pair;
//!    the refresh token is also set as an `HttpOnly` cookie
//! 2. Client sends `Authorization: Bearer <access token>` on each request
//! 3. Server verifies signature and expiry with the access key and extracts
//!    the claims (`user_id`, roles, custom claims)
//! 4. When the access token expires, the client posts its refresh token to
//!    `/v1/auth/refresh` and receives a rotated pair
//!
//! ## Security
//!
//! - Token failures are reported to clients as a single `unauthorized` code
//! - Refresh tokens never authenticate API requests (separate signing key)
//! - The refresh cookie is `HttpOnly` and `SameSite=Strict`

pub mod bearer;
pub mod cookie;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod middleware;

pub use bearer::extract_bearer_token;
pub use cookie::{clear_refresh_cookie, read_refresh_cookie, set_refresh_cookie, RefreshCookieConfig};
pub use credentials::{CredentialVerifier, InMemoryCredentials, UserIdentity};
pub use error::AuthError;
pub use extractor::{Auth, OptionalAuth};
pub use middleware::require_access_token;
