// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Error Taxonomy
//!
//! Every failure surfaced by this crate is one of four categories:
//!
//! | Category | Meaning | Default status |
//! |----------|---------|----------------|
//! | Validation | Malformed or missing input | 400 |
//! | Authentication | Credentials rejected by the provider | 401 |
//! | Authorization | Token invalid, expired or of the wrong type | 401 |
//! | Service | Infrastructure, transport or unexpected failure | 503 |
//!
//! Lower-level errors (reqwest, jsonwebtoken, the AWS SDK) are translated at
//! the boundary where they occur and travel as the `source` of an
//! [`AuthError`].

use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response::error_response;

/// Boxed lower-level cause carried by an [`AuthError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Payload shared by every error category.
#[derive(Debug, Default, thiserror::Error)]
#[error("{message}")]
pub struct ErrorDetail {
    /// Human-readable message, safe to return to callers.
    pub message: String,
    /// Provider-native error code (e.g. `NotAuthorizedException`).
    pub code: Option<String>,
    /// Wrapped lower-level cause.
    pub source: Option<BoxError>,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            source: None,
        }
    }
}

/// Error category without payload.
///
/// Used as the value type of the provider error-code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Validation,
    Authentication,
    Authorization,
    Service,
}

/// Authentication helper error.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Malformed or missing input.
    #[error(transparent)]
    Validation(ErrorDetail),
    /// Credentials rejected by the identity provider.
    #[error(transparent)]
    Authentication(ErrorDetail),
    /// Token invalid, expired or of the wrong type.
    #[error(transparent)]
    Authorization(ErrorDetail),
    /// Infrastructure, transport or unexpected failure.
    #[error(transparent)]
    Service(ErrorDetail),
}

impl AuthError {
    /// Build an error of the given category.
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        let detail = ErrorDetail::new(message);
        match category {
            ErrorCategory::Validation => AuthError::Validation(detail),
            ErrorCategory::Authentication => AuthError::Authentication(detail),
            ErrorCategory::Authorization => AuthError::Authorization(detail),
            ErrorCategory::Service => AuthError::Service(detail),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Validation, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Authentication, message)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Authorization, message)
    }

    pub fn service(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Service, message)
    }

    /// Attach the provider-native error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.detail_mut().code = Some(code.into());
        self
    }

    /// Attach the lower-level cause.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.detail_mut().source = Some(source.into());
        self
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AuthError::Validation(_) => ErrorCategory::Validation,
            AuthError::Authentication(_) => ErrorCategory::Authentication,
            AuthError::Authorization(_) => ErrorCategory::Authorization,
            AuthError::Service(_) => ErrorCategory::Service,
        }
    }

    pub fn detail(&self) -> &ErrorDetail {
        match self {
            AuthError::Validation(d)
            | AuthError::Authentication(d)
            | AuthError::Authorization(d)
            | AuthError::Service(d) => d,
        }
    }

    fn detail_mut(&mut self) -> &mut ErrorDetail {
        match self {
            AuthError::Validation(d)
            | AuthError::Authentication(d)
            | AuthError::Authorization(d)
            | AuthError::Service(d) => d,
        }
    }

    pub fn message(&self) -> &str {
        &self.detail().message
    }

    /// Provider-native error code, if the error came from the provider.
    pub fn code(&self) -> Option<&str> {
        self.detail().code.as_deref()
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Authentication(_) | AuthError::Authorization(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Service(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the error label used in response bodies.
    pub fn error_type(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "BadRequest",
            AuthError::Authentication(_) => "AuthenticationFailed",
            AuthError::Authorization(_) => "Unauthorized",
            AuthError::Service(_) => "ServiceUnavailable",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        error_response(&self, None).into_response()
    }
}
