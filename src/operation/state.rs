//! Observable operation state — app-owned snapshots, SDK-provided transitions.

use std::sync::Arc;

use crate::error::SdkError;
use crate::graphql::{GraphqlError, GraphqlResponse};

/// Where an operation is in its lifecycle.
///
/// `Idle → Loading → Success | Error`. A refetch goes back to `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of a query or mutation: data, errors and the loading flag.
///
/// `Success` may still carry GraphQL errors (partial data). `Error` means the
/// operation never got a reply (auth missing, every endpoint unreachable,
/// undecodable data) and never carries data.
#[derive(Debug, Clone)]
pub struct OperationState<T> {
    status: Status,
    data: Option<T>,
    graphql_errors: Vec<GraphqlError>,
    error: Option<Arc<SdkError>>,
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            data: None,
            graphql_errors: Vec::new(),
            error: None,
        }
    }
}

impl<T> OperationState<T> {
    pub fn idle() -> Self {
        Self::default()
    }

    pub(crate) fn from_outcome(outcome: Result<GraphqlResponse<T>, SdkError>) -> Self {
        let mut state = Self::default();
        state.finish(outcome);
        state
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// The SDK-level failure, if the operation ended in `Error`.
    pub fn error(&self) -> Option<&SdkError> {
        self.error.as_deref()
    }

    /// GraphQL errors returned alongside (or instead of) data.
    pub fn graphql_errors(&self) -> &[GraphqlError] {
        &self.graphql_errors
    }

    pub fn loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    /// Enter `Loading`. Previous data stays visible until the reply lands.
    pub(crate) fn start(&mut self) {
        self.status = Status::Loading;
        self.error = None;
    }

    pub(crate) fn finish(&mut self, outcome: Result<GraphqlResponse<T>, SdkError>) {
        match outcome {
            Ok(response) => {
                self.status = Status::Success;
                self.data = response.data;
                self.graphql_errors = response.errors.unwrap_or_default();
                self.error = None;
            }
            Err(e) => {
                self.status = Status::Error;
                self.data = None;
                self.graphql_errors.clear();
                self.error = Some(Arc::new(e));
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
