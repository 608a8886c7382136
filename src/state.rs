// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{CredentialVerifier, RefreshCookieConfig};
use crate::token::TokenManager;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenManager>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub refresh_cookie: RefreshCookieConfig,
}

impl AppState {
    pub fn new(tokens: TokenManager, credentials: Arc<dyn CredentialVerifier>) -> Self {
        let refresh_cookie = RefreshCookieConfig {
            max_age: tokens.refresh_ttl(),
            ..RefreshCookieConfig::default()
        };
        Self {
            tokens: Arc::new(tokens),
            credentials,
            refresh_cookie,
        }
    }

    pub fn with_refresh_cookie(mut self, refresh_cookie: RefreshCookieConfig) -> Self {
        self.refresh_cookie = refresh_cookie;
        self
    }
}

#[cfg(test)]
impl AppState {
    /// State with a one-hour access lifetime and a single `alice` user
    /// (password `wonderland`, roles `admin` and `user`).
    pub(crate) fn for_tests() -> Self {
        use crate::auth::{InMemoryCredentials, UserIdentity};

        let tokens = TokenManager::new("test-secret", std::time::Duration::from_secs(3600), "test")
            .expect("token manager");
        let credentials = InMemoryCredentials::new().with_user(
            UserIdentity {
                user_id: "u-alice".to_string(),
                username: "alice".to_string(),
                email: Some("alice@example.com".to_string()),
                roles: vec!["admin".to_string(), "user".to_string()],
            },
            "wonderland",
        );
        Self::new(tokens, Arc::new(credentials))
    }
}
