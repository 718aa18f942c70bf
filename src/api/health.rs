// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use super::envelope;
use crate::response::ResponseEnvelope;
use crate::state::AppState;

/// Liveness response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: String,
    /// `cached` once the signing keys have been fetched, else `not_fetched`.
    pub jwks: String,
}

/// Health check endpoint handler.
///
/// Never fetches keys itself; it only reports whether they are cached.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse),
    )
)]
pub async fn health(State(state): State<AppState>) -> ResponseEnvelope {
    let jwks = if state.validator.key_cache().is_cached().await {
        "cached"
    } else {
        "not_fetched"
    };

    envelope(
        Ok(HealthResponse {
            status: "ok".to_string(),
            jwks: jwks.to_string(),
        }),
        None,
    )
}
