// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RSA fixtures for minting real RS256 tokens in tests.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

/// Key id published in [`jwks_document`].
pub const KID: &str = "test-key-1";

const SIGNING_KEY_PEM: &str = include_str!("../../testdata/signing_key.pem");
const FOREIGN_SIGNING_KEY_PEM: &str = include_str!("../../testdata/foreign_signing_key.pem");

/// Modulus of `testdata/signing_key.pem`, base64url without padding.
const SIGNING_KEY_MODULUS: &str = "uqw3a35bBwMYDrDvFTmBx1LcsKtNC_vHOOMkDRTsWPpe9ji86X6pvmlKoeh2EkdleUymNZPKNGzfcUeCX716O2y5FhyrYaOE754mL5vPe0vRBEvTtAPg_KYSmmKNLKi5q5PP9SYbq3atnXUuKrxdduQo61V8cC5lC4NGRsJQQU3zmTMdfFZuVJsJDtmZCNBCVeUFH8Vim_vH0_-prFvlyslVuCePXHh7OD8d-w__ne98h4GfvsWo32QIIpJEgd0sZ-vPuOxWmbiwjEGVua-iuWt08GbpFSfg4rFDZ7GZIlxt0qEt4A8iR2l56BwHuLQc7zPaZDsK2Hba0HiVV8Z1QQ";

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// JWKS document publishing the test signing key.
pub fn jwks_document() -> Value {
    json!({
        "keys": [{
            "kty": "RSA",
            "kid": KID,
            "use": "sig",
            "alg": "RS256",
            "n": SIGNING_KEY_MODULUS,
            "e": "AQAB"
        }]
    })
}

/// Access token claims in the shape Cognito issues them.
pub fn access_claims(exp: i64) -> Value {
    json!({
        "sub": "user-123",
        "iss": "https://cognito-idp.us-east-1.amazonaws.com/us-east-1_test",
        "client_id": "client-abc",
        "origin_jti": "origin-1",
        "event_id": "event-1",
        "token_use": "access",
        "scope": "openid profile email",
        "auth_time": exp - 3600,
        "iat": exp - 3600,
        "exp": exp,
        "jti": "jti-1",
        "username": "test@example.com"
    })
}

/// Sign claims with the published key.
pub fn mint_token(claims: &Value) -> String {
    mint_token_with_kid(claims, Some(KID))
}

/// Sign claims with the published key under an arbitrary `kid`.
pub fn mint_token_with_kid(claims: &Value, kid: Option<&str>) -> String {
    sign(claims, kid, SIGNING_KEY_PEM)
}

/// Sign claims with a key that is not published, claiming the published `kid`.
pub fn mint_foreign_token(claims: &Value) -> String {
    sign(claims, Some(KID), FOREIGN_SIGNING_KEY_PEM)
}

fn sign(claims: &Value, kid: Option<&str>, pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("test key should parse");
    encode(&header, claims, &key).expect("test token should sign")
}
