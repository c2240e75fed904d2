//! Mutation handle — a trigger taking per-call variables.

use async_lock::RwLock;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::state::OperationState;
use crate::client::{ExecuteOptions, GraphqlClient};
use crate::graphql::{GraphqlRequest, Variables};

/// A write operation bound to one document.
///
/// Created with [`GraphqlClient::mutate`]. Calls are not coordinated:
/// overlapping triggers each run to completion and the last one to finish
/// owns the shared state. The client does not deduplicate; making retried
/// mutations safe is up to the caller.
pub struct Mutation<T> {
    client: GraphqlClient,
    document: String,
    options: ExecuteOptions,
    state: Arc<RwLock<OperationState<T>>>,
}

impl<T> Clone for Mutation<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            document: self.document.clone(),
            options: self.options.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: DeserializeOwned + Clone> Mutation<T> {
    pub(crate) fn new(client: GraphqlClient, document: String, options: ExecuteOptions) -> Self {
        Self {
            client,
            document,
            options,
            state: Arc::new(RwLock::new(OperationState::default())),
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    /// Send the mutation with `variables` and return this call's outcome.
    pub async fn trigger(&self, variables: Option<Variables>) -> OperationState<T> {
        self.state.write().await.start();

        let mut request = GraphqlRequest::new(self.document.clone()).with_variables(variables);
        if let Some(name) = &self.options.operation_name {
            request = request.with_operation_name(name.clone());
        }

        let outcome = self.client.execute_typed::<T>(&request, &self.options).await;
        let result = OperationState::from_outcome(outcome);
        *self.state.write().await = result.clone();
        result
    }

    pub async fn state(&self) -> OperationState<T> {
        self.state.read().await.clone()
    }

    pub async fn data(&self) -> Option<T> {
        self.state.read().await.data().cloned()
    }

    pub async fn loading(&self) -> bool {
        self.state.read().await.loading()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error().map(|e| e.to_string())
    }

    /// Forget the last outcome and go back to `Idle`.
    pub async fn reset(&self) {
        self.state.write().await.reset();
    }
}
