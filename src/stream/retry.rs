//! Retry budget and backoff for temporary failures.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PorterError;

/// Called with every classified error. Never influences control flow.
pub type ErrorObserver = Arc<dyn Fn(&PorterError) + Send + Sync>;

/// Delay between two attempts on the same batch.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Backoff {
    /// Retry immediately.
    #[default]
    None,
    /// Same delay before every retry.
    Fixed { delay_ms: u64 },
    /// `initial_ms * multiplier^(attempt-1)`, capped at `max_ms`.
    Exponential {
        initial_ms: u64,
        max_ms: u64,
        multiplier: f64,
    },
}

impl Backoff {
    /// Delay before the `attempt`-th retry (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed { delay_ms } => Duration::from_millis(delay_ms),
            Backoff::Exponential {
                initial_ms,
                max_ms,
                multiplier,
            } => {
                let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
                let base_ms = initial_ms as f64 * multiplier.max(1.0).powi(exp);
                Duration::from_millis(base_ms.min(max_ms as f64) as u64)
            }
        }
    }
}

/// How often and how patiently a temporary failure is retried.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Backoff) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Delay before the `attempt`-th retry, or `None` once the budget is
    /// spent.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_retries {
            return None;
        }
        Some(self.backoff.delay(attempt))
    }
}
