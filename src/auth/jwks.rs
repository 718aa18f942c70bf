// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Caching
//!
//! - The key set is fetched on first use and kept for the lifetime of the
//!   cache; there is no TTL and no background refresh.
//! - Two callers racing on an empty cache may both fetch. The fetch is
//!   idempotent, so no lock is held across it.
//! - An unknown `kid` never triggers a refetch; it is an invalid token.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use jsonwebtoken::DecodingKey;
use tokio::sync::RwLock;

use super::INVALID_TOKEN;
use crate::error::AuthError;

/// Timeout for the key-discovery request.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Key-discovery document URL for a Cognito user pool.
pub fn jwks_url(region: &str, user_pool_id: &str) -> String {
    format!("https://cognito-idp.{region}.amazonaws.com/{user_pool_id}/.well-known/jwks.json")
}

/// Per-validator cache of the provider's signing keys.
#[derive(Clone)]
pub struct KeySetCache {
    /// Key-discovery endpoint
    jwks_url: String,
    /// Key set from the first successful fetch
    cache: Arc<RwLock<Option<JwkSet>>>,
    /// HTTP client
    client: reqwest::Client,
}

impl KeySetCache {
    /// Create a cache for the given user pool.
    pub fn new(region: &str, user_pool_id: &str) -> Self {
        Self::with_url(jwks_url(region, user_pool_id))
    }

    /// Create a cache reading keys from an explicit URL.
    pub fn with_url(jwks_url: impl Into<String>) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            cache: Arc::new(RwLock::new(None)),
            client: reqwest::Client::new(),
        }
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Check if the key set has been fetched.
    pub async fn is_cached(&self) -> bool {
        self.cache.read().await.is_some()
    }

    /// Resolve a key identifier to a verification key.
    ///
    /// Fetches the key set on first use. An unknown `kid` is reported as an
    /// invalid token, without distinguishing it from other token defects.
    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let jwks = self.get_jwks().await?;

        let jwk = jwks
            .keys
            .iter()
            .find(|k| k.common.key_id.as_deref() == Some(kid))
            .ok_or_else(|| AuthError::authorization(INVALID_TOKEN))?;

        jwk_to_decoding_key(jwk)
    }

    /// Fetch JWKS (with caching).
    async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        if let Some(jwks) = &*self.cache.read().await {
            return Ok(jwks.clone());
        }

        let jwks = self.fetch_jwks().await?;

        let mut cache = self.cache.write().await;
        if cache.is_none() {
            *cache = Some(jwks.clone());
        }
        Ok(jwks)
    }

    /// Fetch JWKS from the endpoint.
    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        tracing::debug!(url = %self.jwks_url, "Fetching JWKS");

        let response = self
            .client
            .get(&self.jwks_url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()).with_source(e))?;

        if !response.status().is_success() {
            return Err(fetch_error(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| fetch_error(e.to_string()).with_source(e))
    }
}

fn fetch_error(cause: String) -> AuthError {
    AuthError::service(format!("Failed to fetch JWKS: {cause}"))
}

/// Convert a JWK to a DecodingKey.
///
/// Only RSA keys are accepted; tokens are verified with RS256 exclusively.
fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to build RSA key from JWKS");
                AuthError::service(format!("Failed to create RSA key: {e}")).with_source(e)
            }),
        _ => {
            tracing::error!(kid = ?jwk.common.key_id, "Unsupported key type in JWKS");
            Err(AuthError::service("Unsupported key type in JWKS"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_keys;
    use crate::error::ErrorCategory;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn jwks_url_is_derived_from_region_and_pool() {
        assert_eq!(
            jwks_url("ap-northeast-1", "ap-northeast-1_abc"),
            "https://cognito-idp.ap-northeast-1.amazonaws.com/ap-northeast-1_abc/.well-known/jwks.json"
        );
        let cache = KeySetCache::new("us-east-1", "us-east-1_pool");
        assert_eq!(
            cache.jwks_url(),
            "https://cognito-idp.us-east-1.amazonaws.com/us-east-1_pool/.well-known/jwks.json"
        );
    }

    #[tokio::test]
    async fn cache_initially_empty() {
        let cache = KeySetCache::with_url("https://example.com/.well-known/jwks.json");
        assert!(!cache.is_cached().await);
    }

    #[tokio::test]
    async fn fetches_once_and_reuses_cached_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(test_keys::jwks_document()))
            .expect(1)
            .mount(&server)
            .await;

        let cache = KeySetCache::with_url(format!("{}/jwks.json", server.uri()));
        cache.get_key(test_keys::KID).await.unwrap();
        assert!(cache.is_cached().await);
        cache.get_key(test_keys::KID).await.unwrap();
        // Unknown kid must not trigger a second fetch either.
        let err = cache.get_key("rotated-key").await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Authorization);
        assert_eq!(err.message(), INVALID_TOKEN);
    }

    #[tokio::test]
    async fn non_success_status_is_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let cache = KeySetCache::with_url(format!("{}/jwks.json", server.uri()));
        let err = cache.get_key(test_keys::KID).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Service);
        assert!(err.message().contains("503"), "message was {}", err.message());
        assert!(!cache.is_cached().await);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_service_error() {
        let cache = KeySetCache::with_url("http://127.0.0.1:9/jwks.json");
        let err = cache.get_key(test_keys::KID).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Service);
        assert!(err.message().starts_with("Failed to fetch JWKS: "));
    }

    #[tokio::test]
    async fn non_rsa_key_is_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "keys": [{"kty": "oct", "kid": "hmac-key", "k": "c2VjcmV0"}]
            })))
            .mount(&server)
            .await;

        let cache = KeySetCache::with_url(format!("{}/jwks.json", server.uri()));
        let err = cache.get_key("hmac-key").await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Service);
    }
}
