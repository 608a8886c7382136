// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{auth::require_access_token, state::AppState, token::TokenPair};

pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(auth::login).fallback(auth::method_not_allowed))
        .route("/refresh", post(auth::refresh).fallback(auth::method_not_allowed))
        .route("/logout", post(auth::logout).fallback(auth::method_not_allowed));

    let user_routes = Router::new()
        .route("/me", get(users::get_current_user))
        .route_layer(from_fn_with_state(state.clone(), require_access_token));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .with_state(state);

    Router::new()
        .route("/health/live", get(health::liveness))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::refresh,
        auth::logout,
        users::get_current_user,
        health::liveness
    ),
    components(
        schemas(
            TokenPair,
            auth::LoginRequest,
            auth::RefreshRequest,
            users::UserMeResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Token issuance and refresh"),
        (name = "Users", description = "Authenticated user information"),
        (name = "Health", description = "Liveness probes")
    )
)]
struct ApiDoc;
