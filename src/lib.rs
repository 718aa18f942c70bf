// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cognito Auth Helper - Token Verification and User Directory Client
//!
//! Verifies Cognito-issued access tokens against the user pool's published
//! signing keys and wraps the user-pool operations (sign-in, sign-out,
//! profile lookup, user provisioning) behind one error taxonomy.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer extraction, JWKS cache and RS256 token validation
//! - `config` - Environment configuration
//! - `directory` - User-pool client and provider error classification
//! - `error` - Error taxonomy
//! - `response` - JSON response envelopes

pub mod api;
pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod response;
pub mod state;
