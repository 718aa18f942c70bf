// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction.
//!
//! Tokens are read from a raw `Authorization` value, from a serverless
//! request event, or (for the local server) through the `Auth` extractor:
//!
//! ```rust,ignore
//! async fn me(Auth(user): Auth) -> impl IntoResponse {
//!     // user is UserInfo
//! }
//! ```
//!
//! "Nothing presented" is a validation error; "something presented but not
//! `Bearer <token>`" is an authorization error.

use std::collections::HashMap;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Deserialize;

use super::{UserInfo, AUTHENTICATION_REQUIRED, INVALID_AUTH_HEADER};
use crate::error::AuthError;
use crate::state::AppState;

const BEARER_SCHEME: &str = "bearer";

/// Serverless request event; only the headers are read.
///
/// API Gateway sends `"headers": null` when a request has none.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestEvent {
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
}

impl RequestEvent {
    pub fn new(headers: HashMap<String, String>) -> Self {
        Self {
            headers: Some(headers),
        }
    }

    /// Event carrying a single header.
    pub fn with_header(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(HashMap::from([(name.into(), value.into())]))
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively and any run of whitespace may
/// separate it from the token.
pub fn extract_token_from_header(header: &str) -> Result<String, AuthError> {
    if header.is_empty() {
        return Err(AuthError::validation(AUTHENTICATION_REQUIRED));
    }

    let invalid = || AuthError::authorization(INVALID_AUTH_HEADER);

    let (scheme, rest) = header
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(invalid)?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(invalid());
    }

    let token = rest.trim_start();
    if token.is_empty() || token.contains('\n') {
        return Err(invalid());
    }

    Ok(token.to_string())
}

/// Extract the token from a request event's `Authorization` header.
///
/// Header names are compared case-insensitively; the first match wins.
pub fn extract_token_from_event(event: &RequestEvent) -> Result<String, AuthError> {
    let header = event
        .headers
        .as_ref()
        .and_then(|headers| {
            headers
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(AUTHORIZATION.as_str()))
                .map(|(_, value)| value.as_str())
        })
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AuthError::validation(AUTHENTICATION_REQUIRED))?;

    extract_token_from_header(header)
}

/// Extractor for authenticated users.
///
/// Reads the bearer token, verifies it with the shared validator and
/// projects the claims.
pub struct Auth(pub UserInfo);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user = state.validator.user_info(&token).await?;
        Ok(Auth(user))
    }
}

/// Extractor for the raw bearer token, without local verification.
///
/// Used by handlers that pass the token on to the identity provider.
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(parts).map(BearerToken)
    }
}

fn bearer_token(parts: &Parts) -> Result<String, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AuthError::validation(AUTHENTICATION_REQUIRED))?
        .to_str()
        .map_err(|_| AuthError::authorization(INVALID_AUTH_HEADER))?;

    extract_token_from_header(header)
}
