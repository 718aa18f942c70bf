// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::UserInfo,
    directory::{AuthTokens, CreatedUser, DirectoryUser, OperationResult, UserAttributes},
    error::AuthError,
    response::{error_response, success_response, unclassified_error_response, ResponseEnvelope},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health::health))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/users", post(users::create_user))
        .route("/users/me", get(users::get_current_user))
        .route("/users/{email}", delete(users::delete_user))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

/// Wrap an operation result in a response envelope.
pub(crate) fn envelope<T: Serialize>(
    result: Result<T, AuthError>,
    status: Option<StatusCode>,
) -> ResponseEnvelope {
    match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(body) => success_response(body, status),
            Err(e) => unclassified_error_response(&e, None),
        },
        Err(err) => error_response(&err, None),
    }
}

/// Unwrap a JSON body, turning a rejection into a validation envelope.
pub(crate) fn json_body<T>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, ResponseEnvelope> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            let err = AuthError::validation(format!(
                "Invalid request body: {}",
                rejection.body_text()
            ));
            Err(error_response(&err, None))
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::login,
        auth::logout,
        auth::me,
        users::get_current_user,
        users::create_user,
        users::delete_user
    ),
    components(
        schemas(
            health::HealthResponse,
            auth::LoginRequest,
            users::CreateUserBody,
            AuthTokens,
            UserInfo,
            DirectoryUser,
            UserAttributes,
            CreatedUser,
            OperationResult
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "Sign-in, sign-out and token verification"),
        (name = "Users", description = "User directory management")
    )
)]
struct ApiDoc;
