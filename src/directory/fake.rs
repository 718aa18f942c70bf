// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory identity provider for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::provider::{
    CreateUserRequest, IdentityProvider, ProviderError, RawAuthResult, RawCreatedUser, RawUser,
};

/// Call recorded by [`FakeProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InitiateAuth { client_id: String, username: String, password: String },
    GlobalSignOut(String),
    GetUser(String),
    AdminCreateUser(CreateUserRequest),
    AdminDeleteUser { user_pool_id: String, username: String },
}

/// In-memory provider returning canned results or a canned failure.
#[derive(Default)]
pub struct FakeProvider {
    pub calls: Mutex<Vec<Call>>,
    pub failure: Mutex<Option<ProviderError>>,
    pub auth_result: RawAuthResult,
    pub user: RawUser,
    pub created: RawCreatedUser,
}

impl FakeProvider {
    pub fn failing(error: ProviderError) -> Self {
        Self {
            failure: Mutex::new(Some(error)),
            ..Default::default()
        }
    }

    fn record(&self, call: Call) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn initiate_auth(
        &self,
        client_id: &str,
        username: &str,
        password: &str,
    ) -> Result<RawAuthResult, ProviderError> {
        self.record(Call::InitiateAuth {
            client_id: client_id.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })?;
        Ok(self.auth_result.clone())
    }

    async fn global_sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.record(Call::GlobalSignOut(access_token.to_string()))
    }

    async fn get_user(&self, access_token: &str) -> Result<RawUser, ProviderError> {
        self.record(Call::GetUser(access_token.to_string()))?;
        Ok(self.user.clone())
    }

    async fn admin_create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<RawCreatedUser, ProviderError> {
        self.record(Call::AdminCreateUser(request))?;
        Ok(self.created.clone())
    }

    async fn admin_delete_user(
        &self,
        user_pool_id: &str,
        username: &str,
    ) -> Result<(), ProviderError> {
        self.record(Call::AdminDeleteUser {
            user_pool_id: user_pool_id.to_string(),
            username: username.to_string(),
        })
    }
}
