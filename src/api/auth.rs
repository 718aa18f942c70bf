// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session endpoints: login, logout and token introspection.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::{envelope, json_body};
use crate::auth::{Auth, BearerToken, UserInfo};
use crate::directory::{AuthTokens, OperationResult};
use crate::response::{success_response, ResponseEnvelope};
use crate::state::AppState;

/// Request body for POST /auth/login
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Authenticate with email and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token bundle", body = AuthTokens),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Credentials rejected"),
        (status = 503, description = "Identity provider unavailable"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ResponseEnvelope {
    let request = match json_body(body) {
        Ok(request) => request,
        Err(envelope) => return envelope,
    };

    envelope(
        state
            .directory
            .authenticate(&request.email, &request.password)
            .await,
        None,
    )
}

/// Sign the caller out of every device.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Signed out", body = OperationResult),
        (status = 400, description = "No token presented"),
        (status = 401, description = "Token rejected"),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ResponseEnvelope {
    envelope(state.directory.logout(&token).await, None)
}

/// Verify the caller's access token locally and return its claims.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Verified token claims", body = UserInfo),
        (status = 400, description = "No token presented"),
        (status = 401, description = "Token invalid, expired or not an access token"),
    )
)]
pub async fn me(Auth(user): Auth) -> ResponseEnvelope {
    match serde_json::to_value(user) {
        Ok(body) => success_response(body, None),
        Err(e) => crate::response::unclassified_error_response(&e, None),
    }
}
