// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Auth - Token Authentication Service
//!
//! This crate issues and validates short-lived access tokens and long-lived
//! refresh tokens, both HS256-signed with keys derived from one deployment
//! secret.
//!
//! ## Modules
//!
//! - `token` - Key derivation, claims, and the `TokenManager`
//! - `auth` - HTTP boundary (bearer extraction, cookies, extractors, middleware)
//! - `api` - HTTP API handlers (Axum)
//! - `config` - Environment configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod token;
