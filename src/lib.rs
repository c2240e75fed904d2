//! # Quiz GraphQL SDK
//!
//! Client for the quiz app's GraphQL API with ordered endpoint fallback,
//! supporting both native and WASM targets.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Endpoint newtypes, GraphQL wire types, errors (always available, WASM-safe)
//! 2. **Auth** — `TokenProvider` / `TokenStore` seams; the token is read fresh per call
//! 3. **HTTP** — `GraphqlHttp`: one POST per endpoint, in priority order, until one answers
//! 4. **High-Level Client** — `GraphqlClient` with builder, `execute` and typed `execute_as`
//! 5. **Operations** — `Query` / `Mutation` handles with `idle → loading → success | error` state
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quiz_graphql_sdk::prelude::*;
//!
//! let client = GraphqlClient::builder()
//!     .endpoint("https://api.quizapp.io/graphql")
//!     .endpoint("https://api-fallback.quizapp.io/graphql")
//!     .token_store(secure_store)
//!     .build()?;
//!
//! let reply = client.execute("{ me { id name } }", None, true).await?;
//!
//! let ranking = client.query::<Ranking>(RANKING_QUERY, None, ExecuteOptions::default());
//! let state = ranking.fetch().await;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes: endpoints and the endpoint list.
pub mod shared;

/// GraphQL request/response wire types.
pub mod graphql;

/// Unified SDK error types.
pub mod error;

/// Network constants: default endpoints, timeout, env keys.
pub mod network;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Token providers and the token store seam.
pub mod auth;

// ── Layer 3: HTTP ────────────────────────────────────────────────────────────

/// HTTP transport with endpoint fallback.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `GraphqlClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Layer 5: Operations ──────────────────────────────────────────────────────

/// Query and mutation handles.
#[cfg(feature = "http")]
pub mod operation;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Endpoint, EndpointList};

    // Wire types
    pub use crate::graphql::{
        variables, GraphqlError, GraphqlRequest, GraphqlResponse, Location, PathSegment,
        Variables,
    };

    // Errors
    pub use crate::error::{
        AuthError, GraphqlErrors, HttpError, SdkError, TransportFailure, TransportFailureKind,
    };

    // Network
    pub use crate::network::{DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_ENDPOINTS};

    // Auth
    pub use crate::auth::{
        MemoryTokenStore, NoToken, StaticToken, StoredToken, TokenProvider, TokenStore,
        AUTH_TOKEN_KEY,
    };

    // HTTP client + operations
    #[cfg(feature = "http")]
    pub use crate::client::{ExecuteOptions, GraphqlClient, GraphqlClientBuilder};
    #[cfg(feature = "http")]
    pub use crate::http::FallbackConfig;
    #[cfg(feature = "http")]
    pub use crate::operation::{Mutation, OperationState, Query, Status};
}
