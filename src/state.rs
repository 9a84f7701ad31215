// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{Argon2Hasher, CredentialHasher, TokenCodec};
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    /// Signs and verifies access tokens; immutable after startup.
    pub tokens: TokenCodec,
    pub hasher: Arc<dyn CredentialHasher>,
}

impl AppState {
    pub fn new(store: InMemoryStore, tokens: TokenCodec) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            tokens,
            hasher: Arc::new(Argon2Hasher::default()),
        }
    }

    pub fn with_hasher(mut self, hasher: impl CredentialHasher + 'static) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }
}
