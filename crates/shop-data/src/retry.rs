//! When and how often an outbound request is repeated.

use std::time::Duration;

/// Delay before each retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Retry immediately.
    Immediate,
    /// Same pause before every retry.
    Constant(Duration),
    /// `first`, then doubled per retry, never above `cap`.
    Doubling { first: Duration, cap: Duration },
}

impl Backoff {
    /// Pause before retry number `retry` (0 is the first retry).
    pub fn delay(&self, retry: u32) -> Duration {
        match *self {
            Backoff::Immediate => Duration::ZERO,
            Backoff::Constant(pause) => pause,
            Backoff::Doubling { first, cap } => first
                .checked_mul(1u32.checked_shl(retry).unwrap_or(u32::MAX))
                .map_or(cap, |pause| pause.min(cap)),
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Doubling {
            first: Duration::from_millis(50),
            cap: Duration::from_millis(500),
        }
    }
}

/// How an outbound call is retried.
///
/// Only idempotent reads should carry a policy with retries: a repeated
/// POST can open a second checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub backoff: Backoff,
    /// Also retry `429 Too Many Requests`.
    pub on_rate_limit: bool,
    /// Also retry when the request never got a response.
    pub on_connection_error: bool,
}

impl RetryPolicy {
    /// Retry 5xx, 429 and connection failures up to `max_retries` times.
    pub fn reads(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::default(),
            on_rate_limit: true,
            on_connection_error: true,
        }
    }

    /// A single attempt.
    pub fn never() -> Self {
        Self {
            max_retries: 0,
            backoff: Backoff::Immediate,
            on_rate_limit: false,
            on_connection_error: false,
        }
    }

    /// Replace the backoff.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Whether retry number `retry` may follow a response with `status`.
    pub fn should_retry_status(&self, status: u16, retry: u32) -> bool {
        retry < self.max_retries
            && ((500..600).contains(&status) || (status == 429 && self.on_rate_limit))
    }

    /// Whether retry number `retry` may follow a connection failure.
    pub fn should_retry_connection(&self, retry: u32) -> bool {
        retry < self.max_retries && self.on_connection_error
    }

    /// Pause before retry number `retry`.
    pub fn delay(&self, retry: u32) -> Duration {
        self.backoff.delay(retry)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::reads(1)
    }
}
