//! Query handle — fetch, refetch and the observable state of one document.

use async_lock::RwLock;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::state::OperationState;
use crate::client::{ExecuteOptions, GraphqlClient};
use crate::graphql::{GraphqlRequest, Variables};

/// A read operation bound to one document.
///
/// Created with [`GraphqlClient::query`]. Nothing is sent until
/// [`fetch`](Query::fetch) is called. Clones share state.
///
/// Every fetch supersedes the ones before it: if an earlier fetch completes
/// after a later one has started, its result is dropped instead of
/// overwriting the newer state.
pub struct Query<T> {
    client: GraphqlClient,
    document: String,
    options: ExecuteOptions,
    variables: Arc<RwLock<Option<Variables>>>,
    state: Arc<RwLock<OperationState<T>>>,
    generation: Arc<AtomicU64>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            document: self.document.clone(),
            options: self.options.clone(),
            variables: self.variables.clone(),
            state: self.state.clone(),
            generation: self.generation.clone(),
        }
    }
}

impl<T: DeserializeOwned + Clone> Query<T> {
    pub(crate) fn new(
        client: GraphqlClient,
        document: String,
        variables: Option<Variables>,
        options: ExecuteOptions,
    ) -> Self {
        Self {
            client,
            document,
            options,
            variables: Arc::new(RwLock::new(variables)),
            state: Arc::new(RwLock::new(OperationState::default())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub async fn variables(&self) -> Option<Variables> {
        self.variables.read().await.clone()
    }

    /// Replace the variables used by subsequent fetches.
    pub async fn set_variables(&self, variables: Option<Variables>) {
        *self.variables.write().await = variables;
    }

    /// Run the query with the current variables.
    ///
    /// Returns the outcome of this fetch. The shared state is only updated
    /// if no newer fetch started in the meantime.
    pub async fn fetch(&self) -> OperationState<T> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().await.start();

        let request = self.request().await;
        let outcome = self.client.execute_typed::<T>(&request, &self.options).await;
        let result = OperationState::from_outcome(outcome);

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) == generation {
            *state = result.clone();
        } else {
            tracing::debug!(generation, "Discarding superseded query result");
        }
        result
    }

    /// Re-run the same document. `Some(variables)` replaces the stored
    /// variables first; `None` keeps them.
    pub async fn refetch(&self, variables: Option<Variables>) -> OperationState<T> {
        if let Some(v) = variables {
            self.set_variables(Some(v)).await;
        }
        self.fetch().await
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> OperationState<T> {
        self.state.read().await.clone()
    }

    pub async fn data(&self) -> Option<T> {
        self.state.read().await.data().cloned()
    }

    pub async fn loading(&self) -> bool {
        self.state.read().await.loading()
    }

    /// Error message of the current failure, if any.
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error().map(|e| e.to_string())
    }

    async fn request(&self) -> GraphqlRequest {
        let mut request =
            GraphqlRequest::new(self.document.clone()).with_variables(self.variables().await);
        if let Some(name) = &self.options.operation_name {
            request = request.with_operation_name(name.clone());
        }
        request
    }
}
