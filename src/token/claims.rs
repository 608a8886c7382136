// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access and refresh claims carried inside signed tokens.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open map of product-specific claims.
pub type CustomClaims = HashMap<String, Value>;

/// Custom-claim key promoted to the `username` field at issuance.
pub const USERNAME_CLAIM: &str = "username";

/// Custom-claim key promoted to the `email` field at issuance.
pub const EMAIL_CLAIM: &str = "email";

/// Claims embedded in an access token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Canonical user identifier.
    pub user_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Role names, in issuance order.
    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_claims: Option<CustomClaims>,

    /// Issuer
    pub iss: String,

    /// Subject, always equal to `user_id`
    pub sub: String,

    /// Expiration timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Not before timestamp
    pub nbf: i64,

    /// Issued at timestamp
    pub iat: i64,
}

/// Claims embedded in a refresh token.
///
/// Same identity fields as [`AccessClaims`] plus a unique token id that marks
/// each issuance. The id is carried on the wire as `jti`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub user_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_claims: Option<CustomClaims>,

    /// Unique id of this refresh token.
    #[serde(rename = "jti", alias = "token_id")]
    pub token_id: String,

    pub iss: String,

    pub sub: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    pub nbf: i64,

    pub iat: i64,
}

/// Read and edit helpers shared by every claims shape.
///
/// Implementors only expose their role list, custom-claim map and expiry; the
/// query logic lives here.
pub trait ClaimSet {
    fn roles(&self) -> &[String];

    fn custom_claims(&self) -> Option<&CustomClaims>;

    fn custom_claims_mut(&mut self) -> &mut CustomClaims;

    /// Expiration as a Unix timestamp, if set.
    fn expiry_timestamp(&self) -> Option<i64>;

    fn has_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| r == role)
    }

    /// True if any of `roles` is held. An empty `roles` slice never matches.
    fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    /// Expiration as a UTC datetime, if set and representable.
    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiry_timestamp()
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Whether the expiry has passed. Claims without an expiry never report
    /// themselves as expired.
    fn is_expired(&self) -> bool {
        match self.expiry_timestamp() {
            Some(exp) => Utc::now().timestamp() >= exp,
            None => false,
        }
    }

    fn custom_claim(&self, key: &str) -> Option<&Value> {
        self.custom_claims().and_then(|claims| claims.get(key))
    }

    fn custom_claim_str(&self, key: &str) -> Option<&str> {
        self.custom_claim(key).and_then(Value::as_str)
    }

    /// Integer lookup. Floating-point values are accepted and truncated, since
    /// JSON does not distinguish the two.
    fn custom_claim_i64(&self, key: &str) -> Option<i64> {
        let value = self.custom_claim(key)?;
        value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        })
    }

    fn custom_claim_bool(&self, key: &str) -> Option<bool> {
        self.custom_claim(key).and_then(Value::as_bool)
    }

    /// Set a custom claim on this in-memory value. Tokens already signed from
    /// it are unaffected.
    fn set_custom_claim(&mut self, key: impl Into<String>, value: impl Into<Value>)
    where
        Self: Sized,
    {
        self.custom_claims_mut().insert(key.into(), value.into());
    }

    /// Remove a custom claim, returning its previous value.
    fn delete_custom_claim(&mut self, key: &str) -> Option<Value> {
        self.custom_claims_mut().remove(key)
    }
}

impl ClaimSet for AccessClaims {
    fn roles(&self) -> &[String] {
        &self.roles
    }

    fn custom_claims(&self) -> Option<&CustomClaims> {
        self.custom_claims.as_ref()
    }

    fn custom_claims_mut(&mut self) -> &mut CustomClaims {
        self.custom_claims.get_or_insert_with(HashMap::new)
    }

    fn expiry_timestamp(&self) -> Option<i64> {
        self.exp
    }
}

impl ClaimSet for RefreshClaims {
    fn roles(&self) -> &[String] {
        &self.roles
    }

    fn custom_claims(&self) -> Option<&CustomClaims> {
        self.custom_claims.as_ref()
    }

    fn custom_claims_mut(&mut self) -> &mut CustomClaims {
        self.custom_claims.get_or_insert_with(HashMap::new)
    }

    fn expiry_timestamp(&self) -> Option<i64> {
        self.exp
    }
}

/// Values of the reserved `username`/`email` keys, when they are strings.
pub(crate) fn promoted_identity(custom: Option<&CustomClaims>) -> (Option<String>, Option<String>) {
    let lookup = |key: &str| {
        custom
            .and_then(|claims| claims.get(key))
            .and_then(Value::as_str)
            .map(str::to_owned)
    };
    (lookup(USERNAME_CLAIM), lookup(EMAIL_CLAIM))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_claims() -> AccessClaims {
        AccessClaims {
            user_id: "u1".to_string(),
            roles: vec!["admin".to_string(), "editor".to_string()],
            iss: "issuer-x".to_string(),
            sub: "u1".to_string(),
            exp: Some(Utc::now().timestamp() + 3600),
            nbf: Utc::now().timestamp(),
            iat: Utc::now().timestamp(),
            ..Default::default()
        }
    }

    #[test]
    fn has_role_checks_membership() {
        let claims = sample_claims();
        assert!(claims.has_role("admin"));
        assert!(claims.has_role("editor"));
        assert!(!claims.has_role("Admin"));
        assert!(!claims.has_role("viewer"));
    }

    #[test]
    fn has_any_role_handles_empty_argument() {
        let claims = sample_claims();
        assert!(claims.has_any_role(&["viewer", "editor"]));
        assert!(!claims.has_any_role(&["viewer", "owner"]));
        assert!(!claims.has_any_role(&[]));

        let no_roles = AccessClaims::default();
        assert!(!no_roles.has_any_role(&["admin"]));
    }

    #[test]
    fn is_expired_defaults_to_false_without_expiry() {
        let mut claims = sample_claims();
        assert!(!claims.is_expired());

        claims.exp = Some(Utc::now().timestamp() - 1);
        assert!(claims.is_expired());

        claims.exp = None;
        assert!(!claims.is_expired());
        assert!(claims.expires_at().is_none());
    }

    #[test]
    fn typed_accessors_reject_mismatched_types() {
        let mut claims = sample_claims();
        claims.set_custom_claim("tier", "gold");
        claims.set_custom_claim("quota", 42);
        claims.set_custom_claim("beta", true);

        assert_eq!(claims.custom_claim_str("tier"), Some("gold"));
        assert_eq!(claims.custom_claim_i64("quota"), Some(42));
        assert_eq!(claims.custom_claim_bool("beta"), Some(true));

        assert_eq!(claims.custom_claim_str("quota"), None);
        assert_eq!(claims.custom_claim_i64("tier"), None);
        assert_eq!(claims.custom_claim_bool("tier"), None);
        assert_eq!(claims.custom_claim_str("missing"), None);
        assert!(claims.custom_claim("missing").is_none());
    }

    #[test]
    fn int_accessor_truncates_floats() {
        let mut claims = sample_claims();
        claims.set_custom_claim("level", json!(7.9));
        claims.set_custom_claim("negative", json!(-3.5));
        claims.set_custom_claim("huge", json!(1e300));
        assert_eq!(claims.custom_claim_i64("level"), Some(7));
        assert_eq!(claims.custom_claim_i64("negative"), Some(-3));
        assert_eq!(claims.custom_claim_i64("huge"), None);
    }

    #[test]
    fn set_and_delete_custom_claims() {
        let mut claims = sample_claims();
        assert!(claims.custom_claims.is_none());

        claims.set_custom_claim("team", "core");
        assert_eq!(claims.custom_claim_str("team"), Some("core"));

        assert_eq!(claims.delete_custom_claim("team"), Some(json!("core")));
        assert!(claims.custom_claim("team").is_none());
        assert_eq!(claims.delete_custom_claim("team"), None);
    }

    #[test]
    fn refresh_claims_use_jti_on_the_wire() {
        let claims = RefreshClaims {
            user_id: "u1".to_string(),
            token_id: "abc".to_string(),
            sub: "u1".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["jti"], "abc");
        assert!(value.get("token_id").is_none());

        let parsed: RefreshClaims =
            serde_json::from_value(json!({"user_id": "u1", "token_id": "legacy", "iss": "i", "sub": "u1", "nbf": 0, "iat": 0}))
                .unwrap();
        assert_eq!(parsed.token_id, "legacy");
    }

    #[test]
    fn access_claims_wire_field_names() {
        let mut claims = sample_claims();
        claims.username = Some("alice".to_string());
        claims.set_custom_claim("k", 1);
        let value = serde_json::to_value(&claims).unwrap();
        for field in ["user_id", "username", "roles", "custom_claims", "iss", "sub", "exp", "nbf", "iat"] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
        assert!(value.get("email").is_none());
    }

    #[test]
    fn promoted_identity_only_takes_strings() {
        let mut custom = CustomClaims::new();
        custom.insert(USERNAME_CLAIM.to_string(), json!("alice"));
        custom.insert(EMAIL_CLAIM.to_string(), json!(12));
        let (username, email) = promoted_identity(Some(&custom));
        assert_eq!(username.as_deref(), Some("alice"));
        assert_eq!(email, None);
        assert_eq!(promoted_identity(None), (None, None));
    }
}
