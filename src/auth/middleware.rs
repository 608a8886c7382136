// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applies access-token validation to an entire router subtree. Validated
//! claims are stored in request extensions, where the `Auth` extractor picks
//! them up without re-verifying.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/me", get(handler))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.clone(),
//!         require_access_token,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::bearer::bearer_from_headers;
use crate::state::AppState;

/// Reject requests without a valid access token.
pub async fn require_access_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_from_headers(request.headers()) {
        Ok(token) => token,
        Err(e) => return e.into_response(),
    };

    match state.tokens.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => super::AuthError::from(e).into_response(),
    }
}
