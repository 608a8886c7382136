// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::Auth;
use crate::token::AccessClaims;

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// User's unique ID
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// User's roles
    pub roles: Vec<String>,
}

impl From<AccessClaims> for UserMeResponse {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            email: claims.email,
            roles: claims.roles,
        }
    }
}

/// Get the current authenticated user's information.
///
/// This endpoint returns the identity and roles carried by the access token.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(claims): Auth) -> Json<UserMeResponse> {
    Json(claims.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_me_response_from_claims() {
        let claims = AccessClaims {
            user_id: "user_123".to_string(),
            username: Some("alice".to_string()),
            roles: vec!["admin".to_string()],
            ..Default::default()
        };

        let response: UserMeResponse = claims.into();
        assert_eq!(response.user_id, "user_123");
        assert_eq!(response.username.as_deref(), Some("alice"));
        assert_eq!(response.email, None);
        assert_eq!(response.roles, vec!["admin"]);
    }
}
