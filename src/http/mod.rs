//! HTTP layer — `GraphqlHttp` with ordered endpoint fallback.

pub mod client;
pub mod fallback;

pub use client::GraphqlHttp;
pub use fallback::FallbackConfig;
