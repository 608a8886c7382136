// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup into an explicit [`ServerConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TOKEN_SECRET` | Secret the signing keys are derived from | Required |
//! | `TOKEN_ISSUER` | `iss` claim of issued tokens | `relational-auth` |
//! | `ACCESS_TOKEN_TTL_SECS` | Access token lifetime | `900` |
//! | `REFRESH_TOKEN_TTL_SECS` | Refresh token lifetime | `604800` |
//! | `REFRESH_COOKIE_SECURE` | `Secure` attribute on the refresh cookie | `true` |
//! | `REFRESH_COOKIE_MAX_AGE_SECS` | Refresh cookie `Max-Age` | refresh lifetime |
//! | `AUTH_USERS` | Seed users (`name:password:user_id:role1\|role2[:email]`, `;`-separated) | empty |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::time::Duration;

use crate::auth::{RefreshCookieConfig, UserIdentity};
use crate::token::{DEFAULT_REFRESH_TTL, MAX_TTL};

pub const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";
pub const TOKEN_ISSUER_ENV: &str = "TOKEN_ISSUER";
pub const ACCESS_TOKEN_TTL_ENV: &str = "ACCESS_TOKEN_TTL_SECS";
pub const REFRESH_TOKEN_TTL_ENV: &str = "REFRESH_TOKEN_TTL_SECS";
pub const REFRESH_COOKIE_SECURE_ENV: &str = "REFRESH_COOKIE_SECURE";
pub const REFRESH_COOKIE_MAX_AGE_ENV: &str = "REFRESH_COOKIE_MAX_AGE_SECS";
pub const AUTH_USERS_ENV: &str = "AUTH_USERS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_ISSUER: &str = "relational-auth";
pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// A login account seeded from `AUTH_USERS`.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub identity: UserIdentity,
    pub password: String,
}

impl std::fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedUser")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// Everything the server needs at startup.
#[derive(Clone)]
pub struct ServerConfig {
    pub token_secret: String,
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub refresh_cookie: RefreshCookieConfig,
    pub users: Vec<SeedUser>,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("token_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("refresh_cookie", &self.refresh_cookie)
            .field("users", &self.users.len())
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token_secret = get(TOKEN_SECRET_ENV).ok_or(ConfigError::Missing(TOKEN_SECRET_ENV))?;
        let issuer = get(TOKEN_ISSUER_ENV).unwrap_or_else(|| DEFAULT_ISSUER.to_string());

        let access_ttl = parse_secs(ACCESS_TOKEN_TTL_ENV, get(ACCESS_TOKEN_TTL_ENV))?
            .unwrap_or(DEFAULT_ACCESS_TTL);
        let refresh_ttl = parse_secs(REFRESH_TOKEN_TTL_ENV, get(REFRESH_TOKEN_TTL_ENV))?
            .unwrap_or(DEFAULT_REFRESH_TTL);

        let refresh_cookie = RefreshCookieConfig {
            secure: parse_bool(REFRESH_COOKIE_SECURE_ENV, get(REFRESH_COOKIE_SECURE_ENV))?
                .unwrap_or(true),
            max_age: parse_secs(REFRESH_COOKIE_MAX_AGE_ENV, get(REFRESH_COOKIE_MAX_AGE_ENV))?
                .unwrap_or(refresh_ttl),
        };

        let users = match get(AUTH_USERS_ENV) {
            Some(raw) => parse_users(&raw)?,
            None => Vec::new(),
        };

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_ENV) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: PORT_ENV,
                reason: format!("'{value}' is not a port number"),
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: LOG_FORMAT_ENV,
                    reason: format!("expected 'json' or 'pretty', got '{other}'"),
                })
            }
        };

        Ok(Self {
            token_secret,
            issuer,
            access_ttl,
            refresh_ttl,
            refresh_cookie,
            users,
            host,
            port,
            log_format,
        })
    }
}

fn parse_secs(var: &'static str, value: Option<String>) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 && Duration::from_secs(secs) <= MAX_TTL => {
            Ok(Some(Duration::from_secs(secs)))
        }
        Ok(secs) if secs > 0 => Err(ConfigError::Invalid {
            var,
            reason: format!("{secs} seconds exceeds the maximum of {}", MAX_TTL.as_secs()),
        }),
        _ => Err(ConfigError::Invalid {
            var,
            reason: format!("'{value}' is not a positive number of seconds"),
        }),
    }
}

fn parse_bool(var: &'static str, value: Option<String>) -> Result<Option<bool>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(Some(true)),
        "0" | "false" | "no" => Ok(Some(false)),
        _ => Err(ConfigError::Invalid {
            var,
            reason: format!("'{value}' is not a boolean"),
        }),
    }
}

/// Parse `name:password:user_id:role1|role2[:email]` entries separated by `;`.
pub fn parse_users(raw: &str) -> Result<Vec<SeedUser>, ConfigError> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let fields: Vec<&str> = entry.split(':').collect();
            let (username, password, user_id, roles, email) = match fields.as_slice() {
                [u, p, id, roles] => (*u, *p, *id, *roles, None),
                [u, p, id, roles, email] => (*u, *p, *id, *roles, Some(*email)),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: AUTH_USERS_ENV,
                        reason: "expected name:password:user_id:roles[:email]".to_string(),
                    })
                }
            };
            if username.is_empty() || password.is_empty() || user_id.is_empty() {
                return Err(ConfigError::Invalid {
                    var: AUTH_USERS_ENV,
                    reason: format!("entry for '{username}' has an empty field"),
                });
            }

            Ok(SeedUser {
                identity: UserIdentity {
                    user_id: user_id.to_string(),
                    username: username.to_string(),
                    email: email.filter(|e| !e.is_empty()).map(str::to_string),
                    roles: roles
                        .split('|')
                        .filter(|role| !role.is_empty())
                        .map(str::to_string)
                        .collect(),
                },
                password: password.to_string(),
            })
        })
        .collect()
}
