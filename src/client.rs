//! High-level client — `GraphqlClient` and its builder.
//!
//! This module owns the auth decision (is a token required, is one
//! available) and hands the request to the HTTP layer, which owns the
//! endpoint fallback.

use crate::auth::{read_token, NoToken, StoredToken, TokenProvider, TokenStore};
use crate::error::{AuthError, SdkError};
use crate::graphql::{GraphqlRequest, GraphqlResponse, Variables};
use crate::http::{FallbackConfig, GraphqlHttp};
use crate::network::{DEFAULT_ENDPOINTS, ENV_ENDPOINTS, ENV_TIMEOUT_MS};
use crate::operation::{Mutation, Query};
use crate::shared::EndpointList;

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Per-call options for [`GraphqlClient::execute_with`] and the
/// operation handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Fail with `AuthenticationRequired` when no token is available.
    /// Defaults to `true`.
    pub require_auth: bool,
    /// Sent as `operationName` when set.
    pub operation_name: Option<String>,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            require_auth: true,
            operation_name: None,
        }
    }
}

impl ExecuteOptions {
    /// Options for operations that work without a signed-in user.
    pub fn public() -> Self {
        Self {
            require_auth: false,
            ..Self::default()
        }
    }

    pub fn require_auth(mut self, require: bool) -> Self {
        self.require_auth = require;
        self
    }

    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

/// The primary entry point: a GraphQL client with endpoint fallback.
///
/// Cheap to clone; clones share the HTTP connection pool and token provider.
#[derive(Clone)]
pub struct GraphqlClient {
    pub(crate) http: GraphqlHttp,
    pub(crate) token_provider: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for GraphqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphqlClient")
            .field("endpoints", self.http.endpoints())
            .field("fallback", self.http.fallback())
            .finish_non_exhaustive()
    }
}

impl GraphqlClient {
    pub fn builder() -> GraphqlClientBuilder {
        GraphqlClientBuilder::default()
    }

    pub fn endpoints(&self) -> &EndpointList {
        self.http.endpoints()
    }

    /// Send `query` with optional `variables`.
    ///
    /// With `require_auth` set and no token available this fails with
    /// [`AuthError::AuthenticationRequired`] before any request is made.
    /// A token, when present, is always forwarded.
    ///
    /// GraphQL-level errors come back inside the response, not as `Err`.
    pub async fn execute(
        &self,
        query: &str,
        variables: Option<Variables>,
        require_auth: bool,
    ) -> Result<GraphqlResponse, SdkError> {
        let request = GraphqlRequest::new(query).with_variables(variables);
        let options = ExecuteOptions::default().require_auth(require_auth);
        self.execute_with(&request, &options).await
    }

    pub async fn execute_with(
        &self,
        request: &GraphqlRequest,
        options: &ExecuteOptions,
    ) -> Result<GraphqlResponse, SdkError> {
        request.validate()?;

        let token = read_token(self.token_provider.as_ref()).await;
        if options.require_auth && token.is_none() {
            tracing::debug!("No auth token available for authenticated GraphQL request");
            return Err(AuthError::AuthenticationRequired.into());
        }

        let response = self.http.execute(request, token.as_deref()).await?;
        if response.has_errors() {
            tracing::debug!(
                errors = ?response.error_messages(),
                "GraphQL reply carries errors"
            );
        }
        Ok(response)
    }

    /// [`execute`](Self::execute), decoding `data` into `T`.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<Variables>,
        require_auth: bool,
    ) -> Result<GraphqlResponse<T>, SdkError> {
        self.execute(query, variables, require_auth).await?.decode()
    }

    pub(crate) async fn execute_typed<T: DeserializeOwned>(
        &self,
        request: &GraphqlRequest,
        options: &ExecuteOptions,
    ) -> Result<GraphqlResponse<T>, SdkError> {
        self.execute_with(request, options).await?.decode()
    }

    /// Create a query handle. Nothing is sent until it is fetched.
    pub fn query<T: DeserializeOwned + Clone>(
        &self,
        document: impl Into<String>,
        variables: Option<Variables>,
        options: ExecuteOptions,
    ) -> Query<T> {
        Query::new(self.clone(), document.into(), variables, options)
    }

    /// Create a mutation handle; send it with [`Mutation::trigger`].
    pub fn mutate<T: DeserializeOwned + Clone>(
        &self,
        document: impl Into<String>,
        options: ExecuteOptions,
    ) -> Mutation<T> {
        Mutation::new(self.clone(), document.into(), options)
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct GraphqlClientBuilder {
    endpoints: Vec<String>,
    fallback: FallbackConfig,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl Default for GraphqlClientBuilder {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            fallback: FallbackConfig::default(),
            token_provider: None,
        }
    }
}

impl GraphqlClientBuilder {
    /// Builder seeded from `GRAPHQL_ENDPOINTS` and `GRAPHQL_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, SdkError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builder seeded from an arbitrary key lookup. Unset keys keep the
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SdkError> {
        let mut builder = Self::default();
        if let Some(value) = lookup(ENV_ENDPOINTS) {
            let list = EndpointList::from_csv(&value)?;
            builder.endpoints = list.iter().map(|e| e.to_string()).collect();
        }
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            let ms: u64 = value.trim().parse().map_err(|_| {
                SdkError::Validation(format!("{} must be milliseconds, got {:?}", ENV_TIMEOUT_MS, value))
            })?;
            builder.fallback.attempt_timeout = Duration::from_millis(ms);
        }
        Ok(builder)
    }

    /// Append an endpoint. The first one added is the primary.
    pub fn endpoint(mut self, url: &str) -> Self {
        self.endpoints.push(url.to_string());
        self
    }

    /// Replace the endpoint list.
    pub fn endpoints<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.endpoints = urls.into_iter().map(|u| u.as_ref().to_string()).collect();
        self
    }

    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.fallback.attempt_timeout = timeout;
        self
    }

    pub fn delay_between_attempts(mut self, delay: Duration) -> Self {
        self.fallback = self.fallback.with_delay_between_attempts(delay);
        self
    }

    pub fn token_provider(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.token_provider = Some(Arc::new(provider));
        self
    }

    /// Read the token from `store` under the default key on every call.
    pub fn token_store(self, store: impl TokenStore + 'static) -> Self {
        self.token_provider(StoredToken::new(store))
    }

    pub fn build(self) -> Result<GraphqlClient, SdkError> {
        let endpoints = if self.endpoints.is_empty() {
            EndpointList::parse(DEFAULT_ENDPOINTS)?
        } else {
            EndpointList::parse(&self.endpoints)?
        };

        Ok(GraphqlClient {
            http: GraphqlHttp::new(endpoints, self.fallback)?,
            token_provider: self
                .token_provider
                .unwrap_or_else(|| Arc::new(NoToken)),
        })
    }
}
