//! # Transaction Error Taxonomy
//!
//! Distinguishes on-chain rejection (the result object is preserved for
//! event inspection) from submission-layer failures (a message from the
//! pool or signing layer), from the watch timeout, from giving up after
//! the attempt budget.

use thiserror::Error;

use crate::types::TxResult;

/// Errors from transaction submission.
#[derive(Debug, Error)]
pub enum TxError {
    /// The chain rejected the extrinsic (invalid, dropped, usurped,
    /// retracted, or an `ExtrinsicFailed` event at inclusion). Carries
    /// the final status object for event inspection.
    #[error("Extrinsic rejected at {status:?} stage", status = .0.status)]
    Rejected(TxResult),

    /// The submission layer refused the extrinsic before inclusion
    /// (e.g. pool priority or staleness); message as reported by the
    /// chain SDK.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// The watched submission produced no terminal status within the
    /// watch timeout window.
    #[error("Timeout waiting for extrinsic to resolve")]
    WatchTimeout,

    /// The attempt budget ran out before any attempt resolved. Distinct
    /// from the last underlying cause: the chain did not reject this,
    /// we gave up retrying.
    #[error("Could not execute extrinsic: attempt budget exhausted")]
    AttemptsExhausted,

    /// Transport or SDK failure talking to the chain.
    #[error("Chain API error: {0}")]
    Api(String),
}
