//! # Retry Policy
//!
//! Classification of submission failures into the transient classes the
//! retry loop absorbs, with the cost each class deducts from the attempt
//! budget. The weighting is data, not control flow, so callers can tune
//! it.
//!
//! Classification is deliberately conservative: case-insensitive
//! substring matches on the reported message, so unrelated failures are
//! never mistaken for transient ones. The markers are an external
//! contract with the chain SDK's error text.

use std::time::Duration;

use crate::error::TxError;

/// Pool rejection when another extrinsic holds the slot at equal or
/// better priority.
const PRIORITY_MARKER: &str = "priority is too low";
/// Pool rejection for a stale (already-used nonce) transaction.
const OUTDATED_MARKER: &str = "transaction is outdated";
/// Any timeout-shaped message; also the class of the watch timeout.
const TIMEOUT_MARKER: &str = "timeout";

/// Failure classes recognized by the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Mempool contention; retried after a short backoff.
    PriorityTooLow,
    /// Stale transaction (usually a nonce already consumed); retried
    /// immediately with a fresh nonce.
    Outdated,
    /// The watch window elapsed; retried at a heavy budget cost.
    Timeout,
    /// Everything else; surfaced to the caller without retry.
    Fatal,
}

/// Retry policy for extrinsic submission.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt budget per submission.
    pub max_attempts: u32,
    /// Budget cost of a [`FailureKind::Timeout`] attempt. A single watch
    /// timeout already burns the full watch window, so it is charged
    /// heavily to bound total wall-clock spent on pure timeouts.
    pub timeout_cost: u32,
    /// Backoff before retrying a [`FailureKind::PriorityTooLow`] attempt.
    pub backoff: Duration,
    /// Outer timeout on one watched submission attempt.
    pub watch_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 200,
            timeout_cost: 10,
            backoff: Duration::from_millis(50),
            watch_timeout: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Classifies a submission failure.
    #[must_use]
    pub fn classify(&self, error: &TxError) -> FailureKind {
        match error {
            TxError::WatchTimeout => FailureKind::Timeout,
            TxError::Submission(message) | TxError::Api(message) => {
                let message = message.to_lowercase();
                if message.contains(PRIORITY_MARKER) {
                    FailureKind::PriorityTooLow
                } else if message.contains(OUTDATED_MARKER) {
                    FailureKind::Outdated
                } else if message.contains(TIMEOUT_MARKER) {
                    FailureKind::Timeout
                } else {
                    FailureKind::Fatal
                }
            }
            TxError::Rejected(_) | TxError::AttemptsExhausted => FailureKind::Fatal,
        }
    }

    /// Budget cost of a failed attempt of the given class.
    #[must_use]
    pub fn cost(&self, kind: FailureKind) -> u32 {
        match kind {
            FailureKind::Timeout => self.timeout_cost,
            _ => 1,
        }
    }

    /// Delay before the next attempt, if the class calls for one.
    #[must_use]
    pub fn backoff(&self, kind: FailureKind) -> Option<Duration> {
        match kind {
            FailureKind::PriorityTooLow => Some(self.backoff),
            _ => None,
        }
    }
}

/// A deducting attempt budget.
#[derive(Debug)]
pub struct AttemptBudget {
    remaining: u32,
}

impl AttemptBudget {
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            remaining: max_attempts,
        }
    }

    /// Attempts left before exhaustion.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Deducts `cost` for a failed attempt. Returns `false` once the
    /// budget is exhausted and no further attempt may run.
    pub fn charge(&mut self, cost: u32) -> bool {
        self.remaining = self.remaining.saturating_sub(cost);
        self.remaining > 0
    }
}
