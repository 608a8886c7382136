// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, sync::Arc};

use relational_auth_server::{
    api::router,
    auth::InMemoryCredentials,
    config::{LogFormat, ServerConfig, DEFAULT_LOG_FILTER},
    state::AppState,
    token::TokenManager,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    // Configuration errors abort startup before anything is served
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);

    let tokens = TokenManager::with_refresh_ttl(
        &config.token_secret,
        config.access_ttl,
        config.issuer.clone(),
        config.refresh_ttl,
    )
    .expect("Failed to derive token signing keys");

    let mut credentials = InMemoryCredentials::new();
    for user in &config.users {
        credentials.insert(user.identity.clone(), &user.password);
    }
    if credentials.is_empty() {
        tracing::warn!("No users configured (AUTH_USERS); every login will be rejected");
    }

    let state = AppState::new(tokens, Arc::new(credentials))
        .with_refresh_cookie(config.refresh_cookie.clone());
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(
        %addr,
        issuer = %config.issuer,
        access_ttl_secs = config.access_ttl.as_secs(),
        refresh_ttl_secs = config.refresh_ttl.as_secs(),
        "Relational Auth server listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}
