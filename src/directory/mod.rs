// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # User Directory Client
//!
//! Wraps the user-pool operations behind normalized results and a single
//! error taxonomy:
//!
//! | Operation | Provider call |
//! |-----------|---------------|
//! | [`DirectoryClient::authenticate`] | `InitiateAuth` (`USER_PASSWORD_AUTH`) |
//! | [`DirectoryClient::logout`] | `GlobalSignOut` |
//! | [`DirectoryClient::get_user_info`] | `GetUser` |
//! | [`DirectoryClient::create_user`] | `AdminCreateUser` |
//! | [`DirectoryClient::delete_user`] | `AdminDeleteUser` |
//!
//! Arguments are checked locally first; a rejected argument never reaches
//! the provider. Each operation then makes exactly one provider call, with
//! no retries.

pub mod provider;

#[cfg(test)]
pub(crate) mod fake;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use provider::{
    CognitoProvider, CreateUserRequest, IdentityProvider, ProviderError, RawAuthResult,
    RawCreatedUser, RawUser,
};

use crate::config::AuthSettings;
use crate::error::{AuthError, ErrorCategory};

const DEFAULT_TOKEN_TYPE: &str = "Bearer";
const DEFAULT_EXPIRES_IN: i32 = 3600;

/// Provider error code → category. Codes not listed are service errors.
static PROVIDER_ERROR_CATEGORIES: LazyLock<HashMap<&'static str, ErrorCategory>> =
    LazyLock::new(|| {
        use ErrorCategory::*;
        HashMap::from([
            ("NotAuthorizedException", Authentication),
            ("UserNotFoundException", Authentication),
            ("UserNotConfirmedException", Authentication),
            ("PasswordResetRequiredException", Authentication),
            ("AccessDeniedException", Authorization),
            ("UnauthorizedOperation", Authorization),
            ("InvalidParameterException", Validation),
            ("InvalidPasswordException", Validation),
            ("UsernameExistsException", Validation),
            ("AliasExistsException", Validation),
            ("InternalErrorException", Service),
            ("TooManyRequestsException", Service),
            ("ResourceNotFoundException", Service),
        ])
    });

/// Look up the category of a provider error code.
///
/// Returns `None` for codes outside the table.
pub fn known_category(code: &str) -> Option<ErrorCategory> {
    PROVIDER_ERROR_CATEGORIES.get(code).copied()
}

/// Category for any provider error code.
pub fn classify_provider_code(code: &str) -> ErrorCategory {
    known_category(code).unwrap_or(ErrorCategory::Service)
}

/// Token bundle returned by [`DirectoryClient::authenticate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i32,
}

/// Optional profile attributes of a directory user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserAttributes {
    pub email_verified: bool,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub phone_number: Option<String>,
}

/// User record returned by [`DirectoryClient::get_user_info`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DirectoryUser {
    /// Cognito user ID (`sub` attribute)
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub attributes: UserAttributes,
}

/// Result of [`DirectoryClient::create_user`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedUser {
    pub success: bool,
    /// Provider username of the new user
    pub user_id: Option<String>,
    /// Provider account status (e.g. `FORCE_CHANGE_PASSWORD`)
    pub status: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub message: String,
}

/// Acknowledgement returned by logout and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
}

/// User-pool client with normalized results and classified errors.
#[derive(Clone)]
pub struct DirectoryClient {
    provider: Arc<dyn IdentityProvider>,
    user_pool_id: String,
    client_id: String,
    region: String,
}

impl std::fmt::Debug for DirectoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryClient")
            .field("user_pool_id", &self.user_pool_id)
            .field("client_id", &self.client_id)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl DirectoryClient {
    /// Create a client; both the pool id and the client id are required.
    pub fn new(
        settings: &AuthSettings,
        provider: Arc<dyn IdentityProvider>,
    ) -> Result<Self, AuthError> {
        let user_pool_id = settings.require_user_pool_id()?.to_string();
        let client_id = settings.require_client_id()?.to_string();

        Ok(Self {
            provider,
            user_pool_id,
            client_id,
            region: settings.region.clone(),
        })
    }

    /// Create a client talking to Cognito in the configured region.
    pub async fn connect(settings: &AuthSettings) -> Result<Self, AuthError> {
        // Check ids before loading AWS configuration.
        settings.require_user_pool_id()?;
        settings.require_client_id()?;

        let provider = CognitoProvider::connect(&settings.region).await;
        Self::new(settings, Arc::new(provider))
    }

    pub fn user_pool_id(&self) -> &str {
        &self.user_pool_id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Authenticate with email and password.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AuthTokens, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::validation("Email and password are required"));
        }

        let result = self
            .provider
            .initiate_auth(&self.client_id, email, password)
            .await
            .map_err(|e| classify(e, "Authentication failed", "during authentication"))?;

        Ok(AuthTokens {
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            id_token: result.id_token,
            token_type: result
                .token_type
                .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
            expires_in: result.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
        })
    }

    /// Sign the user out of every device.
    pub async fn logout(&self, access_token: &str) -> Result<OperationResult, AuthError> {
        if access_token.is_empty() {
            return Err(AuthError::validation("Access token is required"));
        }

        self.provider
            .global_sign_out(access_token)
            .await
            .map_err(|e| classify(e, "Logout failed", "during logout"))?;

        Ok(OperationResult {
            success: true,
            message: "Successfully logged out".to_string(),
        })
    }

    /// Fetch the profile of the user owning `access_token`.
    pub async fn get_user_info(&self, access_token: &str) -> Result<DirectoryUser, AuthError> {
        if access_token.is_empty() {
            return Err(AuthError::validation("Access token is required"));
        }

        let user = self
            .provider
            .get_user(access_token)
            .await
            .map_err(|e| classify(e, "Failed to get user info", "getting user info"))?;

        Ok(normalize_user(user))
    }

    /// Create a user with a temporary password.
    ///
    /// `email` and `email_verified=true` are always set; `attributes` are
    /// appended after them. The provider's welcome message is suppressed.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        attributes: Option<&BTreeMap<String, String>>,
    ) -> Result<CreatedUser, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::validation("Email and password are required"));
        }

        let mut user_attributes = vec![
            ("email".to_string(), email.to_string()),
            ("email_verified".to_string(), "true".to_string()),
        ];
        if let Some(extra) = attributes {
            user_attributes.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        let request = CreateUserRequest {
            user_pool_id: self.user_pool_id.clone(),
            username: email.to_string(),
            attributes: user_attributes,
            temporary_password: password.to_string(),
            suppress_notification: true,
        };

        let user = self
            .provider
            .admin_create_user(request)
            .await
            .map_err(|e| classify(e, "Failed to create user", "creating user"))?;

        Ok(CreatedUser {
            success: true,
            user_id: user.username,
            status: user.status,
            created: user.created,
            message: "User created successfully".to_string(),
        })
    }

    /// Delete a user by email.
    pub async fn delete_user(&self, email: &str) -> Result<OperationResult, AuthError> {
        if email.is_empty() {
            return Err(AuthError::validation("Email is required"));
        }

        self.provider
            .admin_delete_user(&self.user_pool_id, email)
            .await
            .map_err(|e| classify(e, "Failed to delete user", "deleting user"))?;

        Ok(OperationResult {
            success: true,
            message: format!("User {email} successfully deleted"),
        })
    }
}

fn normalize_user(user: RawUser) -> DirectoryUser {
    let mut attributes: HashMap<String, String> = user.attributes.into_iter().collect();

    DirectoryUser {
        user_id: attributes.remove("sub"),
        username: user.username,
        email: attributes.remove("email"),
        attributes: UserAttributes {
            email_verified: attributes.get("email_verified").map(String::as_str) == Some("true"),
            given_name: attributes.remove("given_name"),
            family_name: attributes.remove("family_name"),
            phone_number: attributes.remove("phone_number"),
        },
    }
}

/// Translate a provider failure into the error taxonomy.
///
/// `context` prefixes the warning log; `operation` names the call in
/// messages for failures without a provider code.
fn classify(error: ProviderError, context: &str, operation: &str) -> AuthError {
    let (code, message) = match &error {
        ProviderError::Service { code, message } => (code.clone(), message.clone()),
        ProviderError::Transport(cause) => {
            tracing::warn!(error = %cause, "{context}");
            let message = format!("Unexpected error {operation}: {cause}");
            return AuthError::service(message).with_source(error);
        }
    };

    tracing::warn!(code = %code, provider_message = %message, "{context}: {code} - {message}");

    let mapped = match known_category(&code) {
        Some(ErrorCategory::Authentication) => AuthError::authentication("Authentication failed"),
        Some(ErrorCategory::Authorization) => AuthError::authorization("Access denied"),
        Some(ErrorCategory::Validation) => {
            AuthError::validation(format!("Invalid request: {message}"))
        }
        Some(ErrorCategory::Service) => AuthError::service(format!("Service error: {message}")),
        None => AuthError::service(format!("Unexpected error: {message}")),
    };

    mapped.with_code(code).with_source(error)
}
