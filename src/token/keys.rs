// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HKDF-SHA256 derivation of the access and refresh signing keys.
//!
//! Both keys come from the same deployment secret, each with its own
//! `(salt label, info)` pair. Neither key reveals the secret or its sibling,
//! and re-deriving from the same secret reproduces the same keys, so rotating
//! the secret rotates both keys.

use ring::hkdf;

use super::TokenError;

/// Length of each derived key in bytes (HMAC-SHA256 block strength).
pub const KEY_LENGTH: usize = 32;

/// Salt label for the access signing key.
pub const ACCESS_KEY_LABEL: &str = "access";

/// Salt label for the refresh signing key.
pub const REFRESH_KEY_LABEL: &str = "refresh";

/// HKDF info for the access signing key. Bump the suffix on format changes.
pub const ACCESS_KEY_INFO: &str = "relational-auth/access-token-signing-key/v1";

/// HKDF info for the refresh signing key. Bump the suffix on format changes.
pub const REFRESH_KEY_INFO: &str = "relational-auth/refresh-token-signing-key/v1";

/// The two independent signing keys held by a token manager.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    access_key: Vec<u8>,
    refresh_key: Vec<u8>,
}

impl KeyPair {
    /// Key used to sign and verify access tokens.
    pub fn access_key(&self) -> &[u8] {
        &self.access_key
    }

    /// Key used to sign and verify refresh tokens.
    pub fn refresh_key(&self) -> &[u8] {
        &self.refresh_key
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("access_key", &"<redacted>")
            .field("refresh_key", &"<redacted>")
            .finish()
    }
}

/// Output length marker for `ring`'s HKDF expand step.
struct KeyLength(usize);

impl hkdf::KeyType for KeyLength {
    fn len(&self) -> usize {
        self.0
    }
}

/// Derive a single key of `key_length` bytes with HKDF-SHA256
/// (extract with `salt`, expand with `info`).
pub fn derive_key(
    secret: &[u8],
    salt: &[u8],
    info: &[u8],
    key_length: usize,
) -> Result<Vec<u8>, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::KeyDerivation("secret must not be empty".into()));
    }
    if key_length == 0 {
        return Err(TokenError::KeyDerivation(
            "key length must be positive".into(),
        ));
    }

    let prk = hkdf::Salt::new(hkdf::HKDF_SHA256, salt).extract(secret);
    let info = [info];
    let okm = prk.expand(&info, KeyLength(key_length)).map_err(|_| {
        TokenError::KeyDerivation(format!("key length {key_length} exceeds HKDF output limit"))
    })?;

    let mut key = vec![0u8; key_length];
    okm.fill(&mut key)
        .map_err(|_| TokenError::KeyDerivation("HKDF expand failed".into()))?;
    Ok(key)
}

/// Derive the access and refresh keys from one secret.
///
/// The derivation is pure and deterministic for a given set of inputs.
pub fn derive_key_pair(
    secret: &[u8],
    access_label: &str,
    refresh_label: &str,
    access_info: &str,
    refresh_info: &str,
    key_length: usize,
) -> Result<KeyPair, TokenError> {
    let access_key = derive_key(
        secret,
        access_label.as_bytes(),
        access_info.as_bytes(),
        key_length,
    )?;
    let refresh_key = derive_key(
        secret,
        refresh_label.as_bytes(),
        refresh_info.as_bytes(),
        key_length,
    )?;

    Ok(KeyPair {
        access_key,
        refresh_key,
    })
}

/// Derive the key pair with the crate's versioned labels.
pub fn derive_default_key_pair(secret: &[u8]) -> Result<KeyPair, TokenError> {
    derive_key_pair(
        secret,
        ACCESS_KEY_LABEL,
        REFRESH_KEY_LABEL,
        ACCESS_KEY_INFO,
        REFRESH_KEY_INFO,
        KEY_LENGTH,
    )
}
