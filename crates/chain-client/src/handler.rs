//! # Transaction Handler
//!
//! Submits one extrinsic and tracks it through the commit lifecycle.
//!
//! One attempt = one signed-and-watched submission, consumed under the
//! policy's watch timeout. Exactly one of success/failure settles an
//! attempt: the watch loop returns at the first terminal condition and
//! later updates for that attempt are never observed (an `InBlock`
//! resolution is not disturbed by the `Finalized` update that follows
//! it).
//!
//! The retry loop around attempts absorbs only the recognized transient
//! failure classes; see [`crate::retry`].

use tracing::{debug, warn};

use crate::api::ChainApi;
use crate::error::TxError;
use crate::retry::{AttemptBudget, FailureKind, RetryPolicy};
use crate::types::{Extrinsic, ExtrinsicStatus, Signer, TxResult, TxUpdate};

/// Stateless submit-with-retry. For nonce-serialized submission from a
/// shared account, use [`crate::TxQueue`].
#[derive(Debug, Default)]
pub struct TxHandler {
    policy: RetryPolicy,
}

impl TxHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    #[must_use]
    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Submits `extrinsic` signed by `signer` and waits for inclusion
    /// (or finalization when `wait_for_finalization` is set).
    ///
    /// # Errors
    ///
    /// - [`TxError::Rejected`] / [`TxError::Submission`] for fatal
    ///   failures, carrying the chain's result or message
    /// - [`TxError::AttemptsExhausted`] when the attempt budget runs out
    pub async fn submit(
        &self,
        api: &dyn ChainApi,
        extrinsic: &Extrinsic,
        signer: &Signer,
        wait_for_finalization: bool,
    ) -> Result<TxResult, TxError> {
        let mut budget = AttemptBudget::new(self.policy.max_attempts);

        loop {
            let attempt = watch_submission(
                api,
                extrinsic,
                signer,
                None,
                wait_for_finalization,
                &self.policy,
            )
            .await;

            match attempt {
                Ok(result) => return Ok(result),
                Err(error) => {
                    retry_or_bail(&self.policy, &mut budget, extrinsic, error).await?;
                }
            }
        }
    }
}

/// Decides whether a failed attempt is retried. Returns `Ok(())` to
/// retry; any `Err` aborts the loop.
pub(crate) async fn retry_or_bail(
    policy: &RetryPolicy,
    budget: &mut AttemptBudget,
    extrinsic: &Extrinsic,
    error: TxError,
) -> Result<(), TxError> {
    let kind = policy.classify(&error);
    if kind == FailureKind::Fatal {
        return Err(error);
    }

    let cost = policy.cost(kind);
    if !budget.charge(cost) {
        warn!(
            extrinsic = %extrinsic.label(),
            last_error = %error,
            "Attempt budget exhausted"
        );
        return Err(TxError::AttemptsExhausted);
    }

    debug!(
        extrinsic = %extrinsic.label(),
        ?kind,
        cost,
        remaining = budget.remaining(),
        "Retrying transient submission failure"
    );
    if let Some(delay) = policy.backoff(kind) {
        tokio::time::sleep(delay).await;
    }
    Ok(())
}

/// Runs one signed-and-watched submission attempt to its first terminal
/// condition, bounded by the policy's watch timeout.
pub(crate) async fn watch_submission(
    api: &dyn ChainApi,
    extrinsic: &Extrinsic,
    signer: &Signer,
    nonce: Option<u64>,
    wait_for_finalization: bool,
    policy: &RetryPolicy,
) -> Result<TxResult, TxError> {
    let mut updates = api.submit_and_watch(extrinsic, signer, nonce).await?;

    let watch = async {
        while let Some(update) = updates.recv().await {
            if let Some(settled) = settle_update(extrinsic, update, wait_for_finalization) {
                return settled;
            }
        }
        Err(TxError::Submission(
            "watch stream closed before a terminal status".to_owned(),
        ))
    };

    tokio::time::timeout(policy.watch_timeout, watch)
        .await
        .map_err(|_| TxError::WatchTimeout)?
}

/// Applies one status update to the attempt. `None` means the attempt
/// is still pending.
fn settle_update(
    extrinsic: &Extrinsic,
    update: TxUpdate,
    wait_for_finalization: bool,
) -> Option<Result<TxResult, TxError>> {
    if let Some(message) = update.error {
        return Some(Err(TxError::Submission(message)));
    }

    let TxUpdate { status, events, .. } = update;
    debug!(extrinsic = %extrinsic.label(), ?status, "Submission status");

    match status {
        ExtrinsicStatus::Ready | ExtrinsicStatus::Broadcast => None,
        ExtrinsicStatus::InBlock => {
            if events.iter().any(|e| e.is("system", "ExtrinsicFailed")) {
                return Some(Err(TxError::Rejected(TxResult { status, events })));
            }
            if wait_for_finalization {
                None
            } else {
                Some(Ok(TxResult { status, events }))
            }
        }
        ExtrinsicStatus::Finalized | ExtrinsicStatus::FinalityTimeout => {
            Some(Ok(TxResult { status, events }))
        }
        ExtrinsicStatus::Invalid
        | ExtrinsicStatus::Dropped
        | ExtrinsicStatus::Retracted
        | ExtrinsicStatus::Usurped => Some(Err(TxError::Rejected(TxResult { status, events }))),
    }
}
