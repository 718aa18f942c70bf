// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity provider seam.
//!
//! [`IdentityProvider`] is the narrow set of user-pool calls the directory
//! client needs. [`CognitoProvider`] implements it over the AWS SDK; tests
//! substitute an in-memory fake.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cognitoidentityprovider::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cognitoidentityprovider::types::{AttributeType, AuthFlowType, MessageActionType};
use aws_sdk_cognitoidentityprovider::Client;
use chrono::{DateTime, Utc};

/// Failure reported by the identity provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with a named error code.
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// The call failed without a provider error code (network, timeout,
    /// response parsing, request construction).
    #[error("{0}")]
    Transport(String),
}

impl ProviderError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Service {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Token bundle returned by a successful password authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAuthResult {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i32>,
}

/// User record returned by `GetUser`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawUser {
    pub username: Option<String>,
    /// Attribute name/value pairs in provider order
    pub attributes: Vec<(String, String)>,
}

/// User record returned by `AdminCreateUser`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCreatedUser {
    pub username: Option<String>,
    pub status: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

/// Arguments for `AdminCreateUser`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub user_pool_id: String,
    pub username: String,
    pub attributes: Vec<(String, String)>,
    pub temporary_password: String,
    /// Suppress the provider's welcome message.
    pub suppress_notification: bool,
}

/// User-pool operations used by the directory client.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn initiate_auth(
        &self,
        client_id: &str,
        username: &str,
        password: &str,
    ) -> Result<RawAuthResult, ProviderError>;

    async fn global_sign_out(&self, access_token: &str) -> Result<(), ProviderError>;

    async fn get_user(&self, access_token: &str) -> Result<RawUser, ProviderError>;

    async fn admin_create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<RawCreatedUser, ProviderError>;

    async fn admin_delete_user(
        &self,
        user_pool_id: &str,
        username: &str,
    ) -> Result<(), ProviderError>;
}

/// [`IdentityProvider`] backed by the AWS Cognito user-pool API.
#[derive(Clone)]
pub struct CognitoProvider {
    client: Client,
}

impl CognitoProvider {
    /// Load AWS configuration from the environment for the given region.
    pub async fn connect(region: &str) -> Self {
        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self::from_client(Client::new(&shared_config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

/// Translate an SDK failure, keeping the provider's error code when present.
fn sdk_error<E, R>(err: SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.code() {
        Some(code) => ProviderError::service(code, err.message().unwrap_or_default()),
        None => ProviderError::Transport(DisplayErrorContext(&err).to_string()),
    }
}

#[async_trait]
impl IdentityProvider for CognitoProvider {
    async fn initiate_auth(
        &self,
        client_id: &str,
        username: &str,
        password: &str,
    ) -> Result<RawAuthResult, ProviderError> {
        let output = self
            .client
            .initiate_auth()
            .client_id(client_id)
            .auth_flow(AuthFlowType::UserPasswordAuth)
            .auth_parameters("USERNAME", username)
            .auth_parameters("PASSWORD", password)
            .send()
            .await
            .map_err(sdk_error)?;

        let Some(result) = output.authentication_result() else {
            return Ok(RawAuthResult::default());
        };

        Ok(RawAuthResult {
            access_token: result.access_token().map(str::to_string),
            refresh_token: result.refresh_token().map(str::to_string),
            id_token: result.id_token().map(str::to_string),
            token_type: result.token_type().map(str::to_string),
            // The SDK reports an absent value as 0.
            expires_in: Some(result.expires_in()).filter(|secs| *secs > 0),
        })
    }

    async fn global_sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.client
            .global_sign_out()
            .access_token(access_token)
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<RawUser, ProviderError> {
        let output = self
            .client
            .get_user()
            .access_token(access_token)
            .send()
            .await
            .map_err(sdk_error)?;

        let attributes = output
            .user_attributes()
            .iter()
            .filter_map(|attr| {
                attr.value()
                    .map(|value| (attr.name().to_string(), value.to_string()))
            })
            .collect();

        Ok(RawUser {
            username: Some(output.username().to_string()),
            attributes,
        })
    }

    async fn admin_create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<RawCreatedUser, ProviderError> {
        let attributes = request
            .attributes
            .into_iter()
            .map(|(name, value)| {
                AttributeType::builder()
                    .name(name)
                    .value(value)
                    .build()
                    .map_err(|e| ProviderError::Transport(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut call = self
            .client
            .admin_create_user()
            .user_pool_id(request.user_pool_id)
            .username(request.username)
            .set_user_attributes(Some(attributes))
            .temporary_password(request.temporary_password);
        if request.suppress_notification {
            call = call.message_action(MessageActionType::Suppress);
        }

        let output = call.send().await.map_err(sdk_error)?;

        let Some(user) = output.user() else {
            return Ok(RawCreatedUser::default());
        };

        Ok(RawCreatedUser {
            username: user.username().map(str::to_string),
            status: user.user_status().map(|s| s.as_str().to_string()),
            created: user
                .user_create_date()
                .and_then(|d| DateTime::from_timestamp(d.secs(), d.subsec_nanos())),
        })
    }

    async fn admin_delete_user(
        &self,
        user_pool_id: &str,
        username: &str,
    ) -> Result<(), ProviderError> {
        self.client
            .admin_delete_user()
            .user_pool_id(user_pool_id)
            .username(username)
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }
}
