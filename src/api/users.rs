// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User directory endpoints.

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::{envelope, json_body};
use crate::auth::{Auth, BearerToken};
use crate::directory::{CreatedUser, DirectoryUser, OperationResult};
use crate::response::ResponseEnvelope;
use crate::state::AppState;

/// Request body for POST /users
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateUserBody {
    pub email: String,
    /// Temporary password; the user must change it on first sign-in
    pub password: String,
    /// Extra user attributes (e.g. `given_name`)
    pub attributes: Option<BTreeMap<String, String>>,
}

/// Get the directory profile of the token's owner.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User profile", body = DirectoryUser),
        (status = 400, description = "No token presented"),
        (status = 401, description = "Token rejected"),
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ResponseEnvelope {
    envelope(state.directory.get_user_info(&token).await, None)
}

/// Create a user with a temporary password.
///
/// Runs with the server's provider credentials, so the caller must present
/// a valid access token.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    security(("bearer" = [])),
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "User created", body = CreatedUser),
        (status = 400, description = "No token presented, invalid request or user already exists"),
        (status = 401, description = "Token rejected"),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Auth(caller): Auth,
    body: Result<Json<CreateUserBody>, JsonRejection>,
) -> ResponseEnvelope {
    let request = match json_body(body) {
        Ok(request) => request,
        Err(envelope) => return envelope,
    };

    tracing::info!(caller = ?caller.user_id, email = %request.email, "Creating user");

    envelope(
        state
            .directory
            .create_user(&request.email, &request.password, request.attributes.as_ref())
            .await,
        Some(StatusCode::CREATED),
    )
}

/// Delete a user by email.
///
/// Requires a valid access token, like [`create_user`].
#[utoipa::path(
    delete,
    path = "/users/{email}",
    tag = "Users",
    security(("bearer" = [])),
    params(("email" = String, Path, description = "Email of the user to delete")),
    responses(
        (status = 200, description = "User deleted", body = OperationResult),
        (status = 400, description = "No token presented"),
        (status = 401, description = "Token rejected or user not found"),
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Auth(caller): Auth,
    Path(email): Path<String>,
) -> ResponseEnvelope {
    tracing::info!(caller = ?caller.user_id, email = %email, "Deleting user");
    envelope(state.directory.delete_user(&email).await, None)
}
