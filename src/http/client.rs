//! Low-level HTTP client — `GraphqlHttp`.
//!
//! Sends one GraphQL request across the endpoint list. Knows nothing about
//! tokens beyond forwarding the one it is handed; the Layer 4 client decides
//! whether a token is required.

use crate::error::{HttpError, TransportFailure, TransportFailureKind};
use crate::graphql::{GraphqlRequest, GraphqlResponse};
use crate::http::fallback::{classify, FallbackConfig};
use crate::shared::{Endpoint, EndpointList};

use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;

/// Low-level GraphQL transport over an ordered endpoint list.
#[derive(Debug, Clone)]
pub struct GraphqlHttp {
    endpoints: Arc<EndpointList>,
    client: Client,
    fallback: FallbackConfig,
}

impl GraphqlHttp {
    pub fn new(endpoints: EndpointList, fallback: FallbackConfig) -> Result<Self, HttpError> {
        #[allow(unused_mut)]
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(fallback.attempt_timeout)
                .pool_max_idle_per_host(10);
        }

        Ok(Self {
            endpoints: Arc::new(endpoints),
            client: builder.build().map_err(HttpError::ClientBuild)?,
            fallback,
        })
    }

    pub fn endpoints(&self) -> &EndpointList {
        &self.endpoints
    }

    pub fn fallback(&self) -> &FallbackConfig {
        &self.fallback
    }

    /// Deliver `request` to the first endpoint that answers.
    ///
    /// Any reply whose body parses as JSON ends the loop, whatever the HTTP
    /// status, its shape, or whether it carries GraphQL errors. Transport
    /// failures are collected and the next endpoint is tried; when none is
    /// left they come back together in
    /// [`HttpError::AllEndpointsUnreachable`].
    pub async fn execute(
        &self,
        request: &GraphqlRequest,
        token: Option<&str>,
    ) -> Result<GraphqlResponse, HttpError> {
        let mut failures = Vec::with_capacity(self.endpoints.len());

        for (index, endpoint) in self.endpoints.iter().enumerate() {
            if let Some(delay) = self.fallback.delay_before(index) {
                futures_timer::Delay::new(delay).await;
            }

            let attempt = index + 1;
            tracing::debug!(
                attempt,
                total = self.endpoints.len(),
                operation = request.operation_name.as_deref().unwrap_or(""),
                "Sending GraphQL request to {}",
                endpoint
            );

            match self.attempt(endpoint, request, token).await {
                Ok(response) => {
                    if index > 0 {
                        tracing::info!(attempt, "Served by fallback endpoint {}", endpoint);
                    }
                    return Ok(response);
                }
                Err((kind, message)) => {
                    tracing::warn!(
                        attempt,
                        kind = kind.as_str(),
                        "Endpoint {} unreachable: {}",
                        endpoint,
                        message
                    );
                    failures.push(TransportFailure {
                        endpoint: endpoint.to_string(),
                        attempt,
                        kind,
                        message,
                    });
                }
            }
        }

        Err(HttpError::AllEndpointsUnreachable { failures })
    }

    /// One endpoint attempt, bounded by the per-attempt timeout.
    ///
    /// Native targets get the bound from the reqwest client; WASM has no
    /// client timeout, so the request is raced against a timer there.
    async fn attempt(
        &self,
        endpoint: &Endpoint,
        request: &GraphqlRequest,
        token: Option<&str>,
    ) -> Result<GraphqlResponse, (TransportFailureKind, String)> {
        #[cfg(target_arch = "wasm32")]
        {
            crate::http::fallback::with_timeout(
                self.fallback.attempt_timeout,
                self.do_request(endpoint, request, token),
            )
            .await
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.do_request(endpoint, request, token).await
        }
    }

    async fn do_request(
        &self,
        endpoint: &Endpoint,
        request: &GraphqlRequest,
        token: Option<&str>,
    ) -> Result<GraphqlResponse, (TransportFailureKind, String)> {
        let mut req = self
            .client
            .post(endpoint.as_str())
            .header("Content-Type", "application/json")
            .json(request);

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let resp = req.send().await.map_err(|e| (classify(&e), e.to_string()))?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| (classify(&e), e.to_string()))?;

        // Only a body that is not JSON at all counts against the endpoint.
        // Anything else came from a server that may have run the operation.
        let value: Value = serde_json::from_slice(&body).map_err(|e| {
            (
                TransportFailureKind::InvalidJson,
                format!("HTTP {}: body is not JSON: {}", status.as_u16(), e),
            )
        })?;
        let response = GraphqlResponse::from_json(value);

        if !status.is_success() {
            tracing::debug!(
                status = status.as_u16(),
                errors = response.error_messages().len(),
                "GraphQL reply with non-success status from {}",
                endpoint
            );
        }

        Ok(response)
    }
}
