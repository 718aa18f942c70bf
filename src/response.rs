// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Response envelopes for serverless handlers.
//!
//! Handlers return a [`ResponseEnvelope`]: a status code, a fixed set of
//! JSON/CORS headers and a JSON body. The envelope serializes to the proxy
//! integration shape (`statusCode`, `headers`, `body`) and also converts into
//! an axum response for the local server.

use std::collections::BTreeMap;

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::AuthError;

const ALLOWED_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";
const ALLOWED_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";

/// Label for errors that are not part of the taxonomy.
const UNCLASSIFIED_ERROR_TYPE: &str = "InternalServerError";

/// Transport-level response produced by a handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<&'static str, &'static str>,
    pub body: Value,
}

impl ResponseEnvelope {
    fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status_code: status.as_u16(),
            headers: default_headers(),
            body,
        }
    }
}

fn default_headers() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        ("Content-Type", "application/json"),
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Headers", ALLOWED_HEADERS),
        ("Access-Control-Allow-Methods", ALLOWED_METHODS),
    ])
}

/// Build a success envelope (200 unless overridden).
pub fn success_response(body: Value, status: Option<StatusCode>) -> ResponseEnvelope {
    ResponseEnvelope::new(status.unwrap_or(StatusCode::OK), body)
}

/// Build an error envelope from a classified error.
///
/// The status defaults to the category's code; an explicit status wins.
pub fn error_response(error: &AuthError, status: Option<StatusCode>) -> ResponseEnvelope {
    let body = json!({
        "error": error.error_type(),
        "message": error.message(),
    });
    ResponseEnvelope::new(status.unwrap_or_else(|| error.status_code()), body)
}

/// Build an error envelope for a failure outside the taxonomy (500).
pub fn unclassified_error_response(
    error: &(dyn std::error::Error + 'static),
    status: Option<StatusCode>,
) -> ResponseEnvelope {
    if let Some(auth_error) = error.downcast_ref::<AuthError>() {
        return error_response(auth_error, status);
    }

    let body = json!({
        "error": UNCLASSIFIED_ERROR_TYPE,
        "message": error.to_string(),
    });
    ResponseEnvelope::new(status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), body)
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.body)).into_response();

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
                headers.insert(name, HeaderValue::from_static(value));
            }
        }
        response
    }
}
