// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login, refresh and logout endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::{
    auth::{clear_refresh_cookie, read_refresh_cookie, set_refresh_cookie},
    error::ApiError,
    state::AppState,
    token::TokenPair,
};

/// Request body for POST /v1/auth/login
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for POST /v1/auth/refresh
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RefreshRequest {
    /// Refresh token; the `refresh_token` cookie is used when omitted.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Authenticate with username and password.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPair),
        (status = 400, description = "Malformed body or missing field"),
        (status = 401, description = "Invalid credentials"),
        (status = 405, description = "Method not allowed"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<TokenPair>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("username and password are required"));
    }

    let Some(identity) = state.credentials.verify(&request.username, &request.password) else {
        warn!(username = %request.username, "Login rejected");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let pair = state
        .tokens
        .generate_token_pair_with_user_info(
            &identity.user_id,
            &identity.username,
            identity.email.as_deref().unwrap_or_default(),
            identity.roles.iter().map(String::as_str),
        )
        .map_err(|e| {
            warn!(error = %e, "Failed to issue token pair");
            ApiError::internal("Failed to issue tokens")
        })?;

    info!(user_id = %identity.user_id, "User logged in");
    let jar = set_refresh_cookie(jar, &pair.refresh_token, &state.refresh_cookie);
    Ok((jar, Json(pair)))
}

/// Exchange a refresh token for a new token pair.
///
/// The presented refresh token is superseded by the one returned.
#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    tag = "Auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Rotated token pair", body = TokenPair),
        (status = 400, description = "Malformed body or missing refresh token"),
        (status = 401, description = "Invalid or expired refresh token"),
        (status = 405, description = "Method not allowed"),
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, Json<TokenPair>), ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        RefreshRequest::default()
    } else {
        serde_json::from_slice::<RefreshRequest>(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {e}")))?
    };

    let token = request
        .refresh_token
        .filter(|token| !token.is_empty())
        .or_else(|| read_refresh_cookie(&jar))
        .ok_or_else(|| ApiError::bad_request("refresh_token is required"))?;

    let pair = state.tokens.exchange_refresh_token(&token).map_err(|e| {
        warn!(error = %e, expired = e.is_expired(), "Refresh token rejected");
        ApiError::unauthorized("Invalid or expired refresh token")
    })?;

    let jar = set_refresh_cookie(jar, &pair.refresh_token, &state.refresh_cookie);
    Ok((jar, Json(pair)))
}

/// Clear the refresh token cookie.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 204, description = "Refresh cookie cleared"),
        (status = 405, description = "Method not allowed"),
    )
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (StatusCode, CookieJar) {
    (StatusCode::NO_CONTENT, clear_refresh_cookie(jar, &state.refresh_cookie))
}

/// Fallback for unsupported methods on auth routes.
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
