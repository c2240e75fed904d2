//! Network constants for the quiz API.

use std::time::Duration;

/// Default GraphQL endpoints, in priority order.
pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "https://api.quizapp.io/graphql",
    "https://api-fallback.quizapp.io/graphql",
];

/// Per-attempt timeout applied to each endpoint.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(8);

/// Environment variable holding a comma-separated endpoint list.
pub const ENV_ENDPOINTS: &str = "GRAPHQL_ENDPOINTS";

/// Environment variable holding the per-attempt timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "GRAPHQL_TIMEOUT_MS";
