//! Authentication — token providers and the token store seam.
//!
//! ## Security Model
//!
//! - The SDK never creates, refreshes or persists a token. Whoever logs the
//!   user in writes the token into a [`TokenStore`] (secure key-value storage
//!   on device); the client only reads it back through a [`TokenProvider`].
//! - The token is read fresh on every request, so rotation between calls is
//!   picked up with no cache to invalidate.
//! - The token is NEVER logged. It only leaves the process as an
//!   `Authorization: Bearer <token>` header.

pub mod store;

use async_trait::async_trait;
use std::sync::Arc;

pub use store::{MemoryTokenStore, StoredToken, AUTH_TOKEN_KEY};

/// Supplies the bearer token for outgoing requests.
///
/// `None` (or an empty string) means "no token".
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Option<String>;
}

/// Secure key-value storage owned by the application.
///
/// The client itself only ever calls [`get`](TokenStore::get).
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait TokenStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String);
    async fn remove(&self, key: &str);
}

/// A provider that never has a token. Used when no provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl TokenProvider for NoToken {
    async fn token(&self) -> Option<String> {
        None
    }
}

/// A fixed token, e.g. for scripts and tests.
#[derive(Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = if self.0.is_some() { "<redacted>" } else { "None" };
        f.debug_tuple("StaticToken").field(&shown).finish()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<P: TokenProvider + ?Sized> TokenProvider for Arc<P> {
    async fn token(&self) -> Option<String> {
        (**self).token().await
    }
}

/// Read a token from `provider`, treating blank strings as absent.
pub(crate) async fn read_token(provider: &dyn TokenProvider) -> Option<String> {
    provider.token().await.filter(|t| !t.trim().is_empty())
}
