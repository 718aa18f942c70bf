// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the crate. Explicit arguments always take precedence over the
//! environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `COGNITO_USER_POOL_ID` | Cognito user pool identifier | Required |
//! | `COGNITO_CLIENT_ID` | Cognito app client identifier | Required for the directory client |
//! | `AWS_REGION` | Region hosting the user pool | `us-east-1` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use crate::error::AuthError;

/// Environment variable name for the Cognito user pool identifier.
pub const USER_POOL_ID_ENV: &str = "COGNITO_USER_POOL_ID";

/// Environment variable name for the Cognito app client identifier.
pub const CLIENT_ID_ENV: &str = "COGNITO_CLIENT_ID";

/// Environment variable name for the AWS region.
pub const REGION_ENV: &str = "AWS_REGION";

/// Region used when neither an argument nor `AWS_REGION` provides one.
pub const DEFAULT_REGION: &str = "us-east-1";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable selecting `json` or `pretty` log output.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Identity provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub user_pool_id: String,
    pub client_id: String,
    pub region: String,
}

impl AuthSettings {
    /// Build settings from explicit values, falling back to the environment.
    ///
    /// Each blank or missing value is read from its environment variable;
    /// the region then falls back to [`DEFAULT_REGION`]. The ids may still end
    /// up blank; consumers decide which ones they require.
    pub fn new(
        user_pool_id: impl Into<String>,
        client_id: impl Into<String>,
        region: Option<&str>,
    ) -> Self {
        Self::with_fallback(user_pool_id, client_id, region, env_optional)
    }

    /// Like [`AuthSettings::new`], reading fallbacks through `fallback`
    /// instead of the process environment.
    pub fn with_fallback(
        user_pool_id: impl Into<String>,
        client_id: impl Into<String>,
        region: Option<&str>,
        fallback: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let pick = |explicit: String, name: &str| {
            let explicit = explicit.trim();
            if explicit.is_empty() {
                fallback(name).unwrap_or_default()
            } else {
                explicit.to_string()
            }
        };

        let user_pool_id = pick(user_pool_id.into(), USER_POOL_ID_ENV);
        let client_id = pick(client_id.into(), CLIENT_ID_ENV);
        let region = match pick(region.unwrap_or_default().to_string(), REGION_ENV) {
            r if r.is_empty() => DEFAULT_REGION.to_string(),
            r => r,
        };

        Self {
            user_pool_id,
            client_id,
            region,
        }
    }

    /// Load settings from the environment.
    ///
    /// Missing ids are reported by the component that needs them, so this
    /// only fails when the user pool id is absent.
    pub fn from_env() -> Result<Self, AuthError> {
        let settings = Self::new("", "", None);
        settings.require_user_pool_id()?;
        Ok(settings)
    }

    /// Fail with a validation error when the user pool id is blank.
    pub fn require_user_pool_id(&self) -> Result<&str, AuthError> {
        if self.user_pool_id.is_empty() {
            return Err(missing(USER_POOL_ID_ENV));
        }
        Ok(&self.user_pool_id)
    }

    /// Fail with a validation error when the client id is blank.
    pub fn require_client_id(&self) -> Result<&str, AuthError> {
        if self.client_id.is_empty() {
            return Err(missing(CLIENT_ID_ENV));
        }
        Ok(&self.client_id)
    }
}

fn missing(name: &str) -> AuthError {
    AuthError::validation(format!("{name} is required"))
}

pub fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}
