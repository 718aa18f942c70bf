// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use cognito_auth_helper::{
    api::router,
    auth::TokenValidator,
    config::{
        env_optional, env_or_default, AuthSettings, DEFAULT_HOST, DEFAULT_LOG_FILTER,
        DEFAULT_PORT, HOST_ENV, LOG_FORMAT_ENV, PORT_ENV,
    },
    directory::DirectoryClient,
    error::BoxError,
    state::AppState,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match env_optional(LOG_FORMAT_ENV).as_deref() {
        Some("json") => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
    }
}

fn bind_address() -> Result<SocketAddr, BoxError> {
    let host = env_or_default(HOST_ENV, DEFAULT_HOST);
    let port = match env_optional(PORT_ENV) {
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|e| format!("{PORT_ENV} must be a port number: {e}"))?,
        None => DEFAULT_PORT,
    };

    Ok(format!("{host}:{port}").parse()?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing();

    let settings = AuthSettings::from_env()?;
    let validator = TokenValidator::new(&settings.user_pool_id, &settings.region);
    let directory = DirectoryClient::connect(&settings).await?;

    tracing::info!(
        user_pool_id = %settings.user_pool_id,
        region = %settings.region,
        jwks_url = %validator.key_cache().jwks_url(),
        "Loaded user pool configuration"
    );

    let app = router(AppState::new(validator, directory));

    let addr = bind_address()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Cognito auth helper listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
