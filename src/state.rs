// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenValidator;
use crate::directory::DirectoryClient;

/// Shared state for the HTTP handlers.
///
/// One validator is shared so the key set is fetched once per process.
#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<TokenValidator>,
    pub directory: Arc<DirectoryClient>,
}

impl AppState {
    pub fn new(validator: TokenValidator, directory: DirectoryClient) -> Self {
        Self {
            validator: Arc::new(validator),
            directory: Arc::new(directory),
        }
    }
}
