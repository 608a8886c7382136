// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential verification used by the login endpoint.
//!
//! Password storage is not this service's concern: deployments plug their
//! own user directory in through [`CredentialVerifier`]. The in-memory
//! implementation backs local development and tests.

use std::collections::HashMap;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Identity returned for a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIdentity {
    pub user_id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub roles: Vec<String>,
}

/// Checks a username/password pair.
pub trait CredentialVerifier: Send + Sync {
    /// Return the user's identity if the credentials are valid.
    fn verify(&self, username: &str, password: &str) -> Option<UserIdentity>;
}

struct StoredCredential {
    password_digest: [u8; 32],
    identity: UserIdentity,
}

/// Fixed user table keyed by username, holding SHA-256 password digests.
#[derive(Default)]
pub struct InMemoryCredentials {
    users: HashMap<String, StoredCredential>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a user.
    pub fn insert(&mut self, identity: UserIdentity, password: &str) {
        self.users.insert(
            identity.username.clone(),
            StoredCredential {
                password_digest: digest(password),
                identity,
            },
        );
    }

    /// Builder form of [`InMemoryCredentials::insert`].
    pub fn with_user(mut self, identity: UserIdentity, password: &str) -> Self {
        self.insert(identity, password);
        self
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl std::fmt::Debug for InMemoryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCredentials")
            .field("users", &self.users.len())
            .finish()
    }
}

impl CredentialVerifier for InMemoryCredentials {
    fn verify(&self, username: &str, password: &str) -> Option<UserIdentity> {
        let stored = self.users.get(username)?;
        (stored.password_digest == digest(password)).then(|| stored.identity.clone())
    }
}

fn digest(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserIdentity {
        UserIdentity {
            user_id: "u-alice".to_string(),
            username: "alice".to_string(),
            email: Some("alice@example.com".to_string()),
            roles: vec!["admin".to_string()],
        }
    }

    #[test]
    fn verifies_known_user() {
        let creds = InMemoryCredentials::new().with_user(alice(), "wonderland");
        assert_eq!(creds.verify("alice", "wonderland"), Some(alice()));
    }

    #[test]
    fn rejects_wrong_password_and_unknown_user() {
        let creds = InMemoryCredentials::new().with_user(alice(), "wonderland");
        assert_eq!(creds.verify("alice", "Wonderland"), None);
        assert_eq!(creds.verify("bob", "wonderland"), None);
    }

    #[test]
    fn insert_replaces_existing_user() {
        let mut creds = InMemoryCredentials::new();
        creds.insert(alice(), "old");
        creds.insert(alice(), "new");
        assert_eq!(creds.len(), 1);
        assert!(creds.verify("alice", "old").is_none());
        assert!(creds.verify("alice", "new").is_some());
    }

    #[test]
    fn debug_hides_digests() {
        let creds = InMemoryCredentials::new().with_user(alice(), "wonderland");
        assert_eq!(format!("{creds:?}"), "InMemoryCredentials { users: 1 }");
    }
}
