// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token claims and the user-info projection built from them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::extractor::{extract_token_from_event, RequestEvent};
use super::validator::TokenValidator;
use super::AUTHENTICATION_REQUIRED;
use crate::config::DEFAULT_REGION;
use crate::error::AuthError;

/// Claims carried by a Cognito access token.
///
/// Every field is optional; only `token_use` is enforced (by the validator).
/// Claims not listed here are kept in `extra`.
/// See: https://docs.aws.amazon.com/cognito/latest/developerguide/amazon-cognito-user-pools-using-the-access-token.html
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    #[serde(default)]
    pub sub: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    /// App client that requested the token
    #[serde(default)]
    pub client_id: Option<String>,

    /// `access`, `id` or `refresh`
    #[serde(default)]
    pub token_use: Option<String>,

    /// Space-delimited OAuth scopes
    #[serde(default)]
    pub scope: Option<String>,

    #[serde(default)]
    pub auth_time: Option<i64>,

    /// Issued at timestamp
    #[serde(default)]
    pub iat: Option<i64>,

    /// Expiration timestamp
    #[serde(default)]
    pub exp: Option<i64>,

    /// Remaining claims (iss, jti, origin_jti, event_id, ...)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Authenticated user information projected from verified claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    /// Cognito user ID (`sub` claim)
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub client_id: Option<String>,
    pub token_use: Option<String>,
    /// Scopes in token order; empty when the claim is absent
    pub scope: Vec<String>,
    pub auth_time: Option<i64>,
    pub iat: Option<i64>,
    pub exp: Option<i64>,
}

impl UserInfo {
    /// Project verified claims into a user-info record.
    pub fn from_claims(claims: AccessTokenClaims) -> Self {
        let scope = claims
            .scope
            .as_deref()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Self {
            user_id: claims.sub,
            username: claims.username,
            client_id: claims.client_id,
            token_use: claims.token_use,
            scope,
            auth_time: claims.auth_time,
            iat: claims.iat,
            exp: claims.exp,
        }
    }
}

impl From<AccessTokenClaims> for UserInfo {
    fn from(claims: AccessTokenClaims) -> Self {
        Self::from_claims(claims)
    }
}

impl TokenValidator {
    /// Verify a token and project its claims.
    pub async fn user_info(&self, token: &str) -> Result<UserInfo, AuthError> {
        if token.is_empty() {
            return Err(AuthError::validation(AUTHENTICATION_REQUIRED));
        }
        self.validate_token(token).await.map(UserInfo::from_claims)
    }
}

/// Verify a token against a user pool and return the user's information.
///
/// Builds a fresh validator for the call; long-lived callers should keep a
/// [`TokenValidator`] and use [`TokenValidator::user_info`] so the key set
/// is fetched once.
pub async fn validate_and_extract_user_info(
    token: &str,
    user_pool_id: &str,
    region: Option<&str>,
) -> Result<UserInfo, AuthError> {
    if token.is_empty() {
        return Err(AuthError::validation(AUTHENTICATION_REQUIRED));
    }
    if user_pool_id.is_empty() {
        return Err(AuthError::validation("User pool ID is required"));
    }

    let validator = TokenValidator::new(user_pool_id, region.unwrap_or(DEFAULT_REGION));
    validator.user_info(token).await
}

/// Extract the bearer token from a request event, verify it and return the
/// caller's information.
pub async fn require_authentication(
    event: &RequestEvent,
    user_pool_id: &str,
    region: Option<&str>,
) -> Result<UserInfo, AuthError> {
    let token = extract_token_from_event(event)?;
    validate_and_extract_user_info(&token, user_pool_id, region).await
}
