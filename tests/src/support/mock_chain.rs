//! # Mock Chain
//!
//! A scriptable [`ChainApi`] implementation. Each submission consumes
//! the next scripted outcome; with an empty script, submissions succeed
//! with a Ready -> InBlock -> Finalized update sequence. Submitted
//! nonces are recorded for assertions.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};

use chain_client::{
    AccountId, ChainApi, ChainEvent, Extrinsic, ExtrinsicStatus, Signer, TxError, TxResult,
    TxUpdate,
};

/// Scripted behavior of one submission.
pub enum SubmitOutcome {
    /// Stream these updates, in order, then end the stream.
    Updates(Vec<TxUpdate>),
    /// Reject at the pool layer with this message.
    PoolError(String),
    /// Accept the submission but never produce an update (the watch
    /// must time out).
    Hang,
}

impl SubmitOutcome {
    /// The default successful flow: Ready, InBlock (with success event),
    /// Finalized.
    #[must_use]
    pub fn success() -> Self {
        Self::Updates(vec![
            TxUpdate::status(ExtrinsicStatus::Ready),
            TxUpdate::with_events(
                ExtrinsicStatus::InBlock,
                vec![ChainEvent::new("system", "ExtrinsicSuccess", vec![])],
            ),
            TxUpdate::with_events(
                ExtrinsicStatus::Finalized,
                vec![ChainEvent::new("system", "ExtrinsicSuccess", vec![])],
            ),
        ])
    }

    /// InBlock carrying the given events (then Finalized).
    #[must_use]
    pub fn in_block_with_events(events: Vec<ChainEvent>) -> Self {
        Self::Updates(vec![
            TxUpdate::status(ExtrinsicStatus::Ready),
            TxUpdate::with_events(ExtrinsicStatus::InBlock, events.clone()),
            TxUpdate::with_events(ExtrinsicStatus::Finalized, events),
        ])
    }
}

/// One recorded submission.
#[derive(Debug, Clone)]
pub struct RecordedSubmission {
    pub extrinsic: String,
    pub signer: String,
    pub nonce: Option<u64>,
}

/// Scriptable in-memory chain endpoint.
pub struct MockChain {
    account_indices: Mutex<HashMap<AccountId, u64>>,
    outcomes: Mutex<VecDeque<SubmitOutcome>>,
    submissions: Mutex<Vec<RecordedSubmission>>,
    events_tx: broadcast::Sender<Vec<ChainEvent>>,
    // Keeps hung watch channels open so they time out instead of
    // closing.
    hung_senders: Mutex<Vec<mpsc::Sender<TxUpdate>>>,
}

impl MockChain {
    #[must_use]
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(64);
        Self {
            account_indices: Mutex::new(HashMap::new()),
            outcomes: Mutex::new(VecDeque::new()),
            submissions: Mutex::new(Vec::new()),
            events_tx,
            hung_senders: Mutex::new(Vec::new()),
        }
    }

    /// Sets the chain-reported next index for an account.
    pub fn set_account_index(&self, address: impl Into<AccountId>, index: u64) {
        self.account_indices
            .lock()
            .expect("lock")
            .insert(address.into(), index);
    }

    /// Appends a scripted outcome for the next submission.
    pub fn script(&self, outcome: SubmitOutcome) {
        self.outcomes.lock().expect("lock").push_back(outcome);
    }

    /// All recorded submissions, in order.
    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.lock().expect("lock").clone()
    }

    /// Nonces of the recorded submissions, in order.
    pub fn submitted_nonces(&self) -> Vec<Option<u64>> {
        self.submissions().into_iter().map(|s| s.nonce).collect()
    }

    /// Emits a system event batch to event queue subscribers.
    pub fn emit_events(&self, batch: Vec<ChainEvent>) {
        // A send error just means nobody is subscribed.
        let _ = self.events_tx.send(batch);
    }
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainApi for MockChain {
    async fn account_next_index(&self, address: &AccountId) -> Result<u64, TxError> {
        Ok(self
            .account_indices
            .lock()
            .expect("lock")
            .get(address)
            .copied()
            .unwrap_or(0))
    }

    async fn submit_and_watch(
        &self,
        extrinsic: &Extrinsic,
        signer: &Signer,
        nonce: Option<u64>,
    ) -> Result<mpsc::Receiver<TxUpdate>, TxError> {
        self.submissions.lock().expect("lock").push(RecordedSubmission {
            extrinsic: extrinsic.label(),
            signer: signer.name.clone(),
            nonce,
        });

        let outcome = self
            .outcomes
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(SubmitOutcome::success);

        match outcome {
            SubmitOutcome::PoolError(message) => Err(TxError::Submission(message)),
            SubmitOutcome::Hang => {
                let (tx, rx) = mpsc::channel(1);
                self.hung_senders.lock().expect("lock").push(tx);
                Ok(rx)
            }
            SubmitOutcome::Updates(updates) => {
                let (tx, rx) = mpsc::channel(updates.len().max(1));
                tokio::spawn(async move {
                    for update in updates {
                        if tx.send(update).await.is_err() {
                            break;
                        }
                    }
                });
                Ok(rx)
            }
        }
    }

    fn system_events(&self) -> broadcast::Receiver<Vec<ChainEvent>> {
        self.events_tx.subscribe()
    }

    fn signer_from_uri(&self, name: &str, uri: &str) -> Result<Signer, TxError> {
        Ok(Signer {
            name: name.to_owned(),
            address: AccountId::from(format!("mock:{uri}")),
        })
    }
}

/// A signer for tests that bypass the keyring.
#[must_use]
pub fn test_signer(name: &str) -> Signer {
    Signer {
        name: name.to_owned(),
        address: AccountId::from(name),
    }
}

/// A transfer-shaped extrinsic for tests.
#[must_use]
pub fn test_extrinsic() -> Extrinsic {
    Extrinsic::new("balances", "transfer", serde_json::json!({ "value": 1 }))
}

/// Asserts that a result is a rejection and returns the chain result.
pub fn expect_rejected(error: TxError) -> TxResult {
    match error {
        TxError::Rejected(result) => result,
        other => panic!("expected TxError::Rejected, got {other:?}"),
    }
}
