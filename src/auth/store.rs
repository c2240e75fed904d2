//! Token store implementations and the store-backed provider.

use async_lock::RwLock;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::{TokenProvider, TokenStore};

/// Key under which the app persists the auth token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// In-process [`TokenStore`], for tests and platforms without secure storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `token` under [`AUTH_TOKEN_KEY`].
    pub fn with_token(token: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(AUTH_TOKEN_KEY.to_string(), token.into());
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    async fn remove(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}

/// Reads the token from a [`TokenStore`] on every call.
#[derive(Debug, Clone)]
pub struct StoredToken<S> {
    store: S,
    key: String,
}

impl<S: TokenStore> StoredToken<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, AUTH_TOKEN_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<S: TokenStore> TokenProvider for StoredToken<S> {
    async fn token(&self) -> Option<String> {
        self.store.get(&self.key).await
    }
}
