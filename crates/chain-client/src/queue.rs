//! # Transaction Queue
//!
//! [`crate::TxHandler`] semantics plus serialized per-account nonce
//! allocation, so multiple in-flight submissions from one account do not
//! race each other for nonces.
//!
//! The nonce cache is advisory and process-local: the effective nonce is
//! `max(cached, chain_reported)`, allocation advances the cache to
//! `nonce + 1`, and a failed attempt rolls the cache back to the failed
//! nonce when that is lower than the cached value (never silently
//! backward otherwise). The read-query-advance sequence runs under one
//! lock held across the chain query, which is what makes concurrent
//! allocations hand out distinct consecutive nonces.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::api::ChainApi;
use crate::error::TxError;
use crate::handler::{retry_or_bail, watch_submission};
use crate::retry::{AttemptBudget, RetryPolicy};
use crate::types::{AccountId, Extrinsic, Signer, TxResult};

/// Nonce-serializing transaction queue for one chain connection.
pub struct TxQueue {
    api: Arc<dyn ChainApi>,
    policy: RetryPolicy,
    nonce_tracker: Mutex<HashMap<AccountId, u64>>,
}

impl TxQueue {
    #[must_use]
    pub fn new(api: Arc<dyn ChainApi>) -> Self {
        Self::with_policy(api, RetryPolicy::default())
    }

    #[must_use]
    pub fn with_policy(api: Arc<dyn ChainApi>, policy: RetryPolicy) -> Self {
        Self {
            api,
            policy,
            nonce_tracker: Mutex::new(HashMap::new()),
        }
    }

    /// Allocates the next nonce for `address` and advances the cache.
    ///
    /// Holds the tracker lock across the chain query so concurrent
    /// allocations for the same account serialize and receive distinct
    /// consecutive values.
    pub async fn allocate_nonce(&self, address: &AccountId) -> Result<u64, TxError> {
        let mut tracker = self.nonce_tracker.lock().await;
        let by_cache = tracker.get(address).copied().unwrap_or(0);
        let by_chain = self.api.account_next_index(address).await?;
        let nonce = by_cache.max(by_chain);
        tracker.insert(address.clone(), nonce + 1);
        debug!(%address, nonce, "Allocated nonce");
        Ok(nonce)
    }

    /// Records that a submission with `nonce` failed, rolling the cache
    /// back so the nonce can be reused. Only ever moves the cache
    /// backward; a fresher allocation is left untouched.
    pub async fn mark_nonce_failed(&self, address: &AccountId, nonce: u64) {
        let mut tracker = self.nonce_tracker.lock().await;
        let Some(cached) = tracker.get_mut(address) else {
            return;
        };
        if nonce < *cached {
            debug!(%address, nonce, cached = *cached, "Rolling nonce cache back");
            *cached = nonce;
        }
    }

    /// Submits `extrinsic` signed by `signer`, allocating a fresh nonce
    /// per attempt.
    ///
    /// Resolves at inclusion, or at finalization when
    /// `wait_for_finalization` is set. Transient failures are retried
    /// per the queue's [`RetryPolicy`]; see
    /// [`crate::TxHandler::submit`] for the error contract.
    pub async fn submit(
        &self,
        extrinsic: &Extrinsic,
        signer: &Signer,
        wait_for_finalization: bool,
    ) -> Result<TxResult, TxError> {
        let address = &signer.address;
        let mut budget = AttemptBudget::new(self.policy.max_attempts);

        loop {
            let nonce = self.allocate_nonce(address).await?;
            let attempt = watch_submission(
                self.api.as_ref(),
                extrinsic,
                signer,
                Some(nonce),
                wait_for_finalization,
                &self.policy,
            )
            .await;

            match attempt {
                Ok(result) => return Ok(result),
                Err(error) => {
                    self.mark_nonce_failed(address, nonce).await;
                    retry_or_bail(&self.policy, &mut budget, extrinsic, error).await?;
                }
            }
        }
    }
}
