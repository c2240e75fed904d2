//! Operation handles — queries and mutations with three-state results.
//!
//! The UI owns these handles and renders from their snapshots. The client
//! holds no cancellation token: a request in flight runs to completion or
//! timeout even if the screen that started it is gone, so callers must not
//! apply a snapshot to a view that no longer exists.

pub mod mutation;
pub mod query;
pub mod state;

pub use mutation::Mutation;
pub use query::Query;
pub use state::{OperationState, Status};
