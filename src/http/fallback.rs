//! Fallback policy for the endpoint loop.

use futures_util::future::{select, Either};
use std::future::Future;
use std::time::Duration;

use crate::error::TransportFailureKind;
use crate::network::DEFAULT_ATTEMPT_TIMEOUT;

/// How the client walks the endpoint list.
///
/// Endpoints are tried strictly in order, one at a time. Only a
/// transport-level failure moves on to the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackConfig {
    /// Upper bound on a single endpoint attempt, connect through body read.
    /// Applied by reqwest on native targets and by a timer race on WASM.
    pub attempt_timeout: Duration,
    /// Pause before trying the next endpoint. `None` moves on immediately.
    pub delay_between_attempts: Option<Duration>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            delay_between_attempts: None,
        }
    }
}

impl FallbackConfig {
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_delay_between_attempts(mut self, delay: Duration) -> Self {
        self.delay_between_attempts = (!delay.is_zero()).then_some(delay);
        self
    }

    /// Delay to wait before trying the endpoint at list position `index`.
    /// The first endpoint never waits.
    pub fn delay_before(&self, index: usize) -> Option<Duration> {
        if index == 0 {
            return None;
        }
        self.delay_between_attempts
    }
}

/// Race `attempt` against a timer; losing the race is a
/// [`TransportFailureKind::Timeout`]. Used where the HTTP client has no
/// timeout of its own (WASM).
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) async fn with_timeout<F, T>(
    timeout: Duration,
    attempt: F,
) -> Result<T, (TransportFailureKind, String)>
where
    F: Future<Output = Result<T, (TransportFailureKind, String)>>,
{
    let timer = futures_timer::Delay::new(timeout);
    futures_util::pin_mut!(attempt, timer);
    match select(attempt, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err((
            TransportFailureKind::Timeout,
            format!("no reply within {} ms", timeout.as_millis()),
        )),
    }
}

/// Map a reqwest failure onto the transport failure taxonomy.
pub(crate) fn classify(err: &reqwest::Error) -> TransportFailureKind {
    if err.is_timeout() {
        return TransportFailureKind::Timeout;
    }
    #[cfg(not(target_arch = "wasm32"))]
    if err.is_connect() {
        return TransportFailureKind::Connect;
    }
    if err.is_body() || err.is_decode() {
        TransportFailureKind::Body
    } else {
        TransportFailureKind::Request
    }
}
