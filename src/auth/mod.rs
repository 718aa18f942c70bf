// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Verification of Cognito access tokens presented to serverless handlers.
//!
//! ## Auth Flow
//!
//! 1. Client authenticates against the user pool (see [`crate::directory`])
//! 2. Client sends `Authorization: Bearer <access token>`
//! 3. Handler:
//!    - Extracts the bearer token from the header or request event
//!    - Fetches the pool's JWKS via HTTPS (once per validator)
//!    - Verifies RS256 signature, expiry and `token_use == "access"`
//!    - Projects the claims into a [`UserInfo`]
//!
//! ## Error messages
//!
//! Messages are fixed and deliberately coarse: an unknown key id, a bad
//! signature, a malformed header and a wrong token type all read as
//! [`INVALID_TOKEN`]. Only expiry is reported separately.

pub mod claims;
pub mod extractor;
pub mod jwks;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_keys;

pub use claims::{
    require_authentication, validate_and_extract_user_info, AccessTokenClaims, UserInfo,
};
pub use extractor::{
    extract_token_from_event, extract_token_from_header, Auth, BearerToken, RequestEvent,
};
pub use jwks::KeySetCache;
pub use validator::TokenValidator;

/// Nothing was presented where a token was required.
pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";

/// A header was presented but is not `Bearer <token>`.
pub const INVALID_AUTH_HEADER: &str = "Invalid authentication header";

/// Generic verification failure.
pub const INVALID_TOKEN: &str = "Invalid token";

pub const TOKEN_EXPIRED: &str = "Token has expired";
