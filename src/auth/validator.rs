// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cognito access token verification.
//!
//! ## Checks
//!
//! 1. Token present (otherwise a validation error)
//! 2. Header carries a `kid` that resolves in the pool's JWKS
//! 3. RS256 signature and `exp` (no audience check: Cognito access tokens
//!    carry `client_id` instead of `aud`)
//! 4. `token_use == "access"`
//!
//! Expired tokens get their own message. Every other defect, including an
//! unknown `kid`, is reported as the same generic invalid-token error.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use super::claims::AccessTokenClaims;
use super::jwks::KeySetCache;
use super::{INVALID_TOKEN, TOKEN_EXPIRED};
use crate::error::AuthError;

/// Only access tokens are accepted.
const EXPECTED_TOKEN_USE: &str = "access";

/// Verifies Cognito access tokens against a user pool's published keys.
#[derive(Clone)]
pub struct TokenValidator {
    user_pool_id: String,
    region: String,
    keys: KeySetCache,
}

impl TokenValidator {
    pub fn new(user_pool_id: impl Into<String>, region: impl Into<String>) -> Self {
        let user_pool_id = user_pool_id.into();
        let region = region.into();
        let keys = KeySetCache::new(&region, &user_pool_id);
        Self {
            user_pool_id,
            region,
            keys,
        }
    }

    /// Use an explicit key cache (e.g. one pointed at a different URL).
    pub fn with_key_cache(mut self, keys: KeySetCache) -> Self {
        self.keys = keys;
        self
    }

    pub fn user_pool_id(&self) -> &str {
        &self.user_pool_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn key_cache(&self) -> &KeySetCache {
        &self.keys
    }

    /// Verify a token and return its claims unchanged.
    pub async fn validate_token(&self, token: &str) -> Result<AccessTokenClaims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::validation("Token is required"));
        }

        let header = decode_header(token).map_err(|_| invalid_token())?;
        let kid = header.kid.ok_or_else(invalid_token)?;

        let decoding_key = self.keys.get_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_aud = false;
        validation.validate_exp = true;
        validation.leeway = 0;
        // A token whose `exp` is the current second is already expired.
        validation.reject_tokens_expiring_in_less_than = 1;

        let token_data =
            decode::<AccessTokenClaims>(token, &decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::authorization(TOKEN_EXPIRED),
                    _ => invalid_token(),
                }
            })?;

        let claims = token_data.claims;
        if claims.token_use.as_deref() != Some(EXPECTED_TOKEN_USE) {
            return Err(invalid_token());
        }

        Ok(claims)
    }
}

fn invalid_token() -> AuthError {
    AuthError::authorization(INVALID_TOKEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_keys::{self, mint_token, now};
    use crate::error::ErrorCategory;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn validator_with_jwks() -> (TokenValidator, MockServer) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(test_keys::jwks_document()))
            .mount(&server)
            .await;

        let validator = TokenValidator::new("us-east-1_test", "us-east-1")
            .with_key_cache(KeySetCache::with_url(format!("{}/jwks.json", server.uri())));
        (validator, server)
    }

    #[tokio::test]
    async fn valid_access_token_returns_claims() {
        let (validator, _server) = validator_with_jwks().await;
        let token = mint_token(&test_keys::access_claims(now() + 3600));

        let claims = validator.validate_token(&token).await.unwrap();
        assert_eq!(claims.sub.as_deref(), Some("user-123"));
        assert_eq!(claims.token_use.as_deref(), Some("access"));
        assert_eq!(claims.scope.as_deref(), Some("openid profile email"));
        assert_eq!(claims.extra["iss"], "https://cognito-idp.us-east-1.amazonaws.com/us-east-1_test");
    }

    #[tokio::test]
    async fn empty_token_is_validation_error() {
        let (validator, _server) = validator_with_jwks().await;
        let err = validator.validate_token("").await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[tokio::test]
    async fn expired_token_has_distinct_message() {
        let (validator, _server) = validator_with_jwks().await;
        let token = mint_token(&test_keys::access_claims(now() - 60));

        let err = validator.validate_token(&token).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Authorization);
        assert_eq!(err.message(), TOKEN_EXPIRED);
        assert_ne!(err.message(), INVALID_TOKEN);
    }

    #[tokio::test]
    async fn token_expiring_this_second_is_expired() {
        let (validator, _server) = validator_with_jwks().await;
        let token = mint_token(&test_keys::access_claims(now()));

        let err = validator.validate_token(&token).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Authorization);
        assert_eq!(err.message(), TOKEN_EXPIRED);
    }

    #[tokio::test]
    async fn id_and_refresh_tokens_are_rejected() {
        let (validator, _server) = validator_with_jwks().await;

        for token_use in ["id", "refresh"] {
            let mut claims = test_keys::access_claims(now() + 3600);
            claims["token_use"] = json!(token_use);
            let token = mint_token(&claims);

            let err = validator.validate_token(&token).await.unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Authorization);
            assert_eq!(err.message(), INVALID_TOKEN);
        }
    }

    #[tokio::test]
    async fn missing_token_use_is_rejected() {
        let (validator, _server) = validator_with_jwks().await;
        let mut claims = test_keys::access_claims(now() + 3600);
        claims.as_object_mut().unwrap().remove("token_use");

        let err = validator.validate_token(&mint_token(&claims)).await.unwrap_err();
        assert_eq!(err.message(), INVALID_TOKEN);
    }

    #[tokio::test]
    async fn unknown_kid_matches_malformed_token_message() {
        let (validator, _server) = validator_with_jwks().await;
        let claims = test_keys::access_claims(now() + 3600);
        let unknown = test_keys::mint_token_with_kid(&claims, Some("not-published"));

        let unknown_err = validator.validate_token(&unknown).await.unwrap_err();
        let garbage_err = validator.validate_token("not.a.jwt").await.unwrap_err();

        assert_eq!(unknown_err.category(), ErrorCategory::Authorization);
        assert_eq!(garbage_err.category(), ErrorCategory::Authorization);
        assert_eq!(unknown_err.message(), garbage_err.message());
    }

    #[tokio::test]
    async fn missing_kid_is_invalid_token() {
        let (validator, _server) = validator_with_jwks().await;
        let claims = test_keys::access_claims(now() + 3600);
        let token = test_keys::mint_token_with_kid(&claims, None);

        let err = validator.validate_token(&token).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Authorization);
        assert_eq!(err.message(), INVALID_TOKEN);
    }

    #[tokio::test]
    async fn foreign_signature_is_invalid_token() {
        let (validator, _server) = validator_with_jwks().await;
        let claims = test_keys::access_claims(now() + 3600);
        let token = test_keys::mint_foreign_token(&claims);

        let err = validator.validate_token(&token).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Authorization);
        assert_eq!(err.message(), INVALID_TOKEN);
    }

    #[tokio::test]
    async fn non_rs256_algorithm_is_invalid_token() {
        let (validator, _server) = validator_with_jwks().await;
        let header = URL_SAFE_NO_PAD.encode(
            json!({"alg": "HS256", "typ": "JWT", "kid": test_keys::KID}).to_string(),
        );
        let payload = URL_SAFE_NO_PAD.encode(test_keys::access_claims(now() + 3600).to_string());
        let token = format!("{header}.{payload}.c2lnbmF0dXJl");

        let err = validator.validate_token(&token).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Authorization);
        assert_eq!(err.message(), INVALID_TOKEN);
    }

    #[tokio::test]
    async fn jwks_outage_is_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let validator = TokenValidator::new("us-east-1_test", "us-east-1")
            .with_key_cache(KeySetCache::with_url(format!("{}/jwks.json", server.uri())));
        let token = mint_token(&test_keys::access_claims(now() + 3600));

        let err = validator.validate_token(&token).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Service);
        assert!(err.message().contains("Failed to fetch JWKS"));
    }
}
