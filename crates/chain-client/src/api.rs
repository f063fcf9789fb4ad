//! # Chain API Seam
//!
//! The boundary to the external chain SDK. Everything protocol-shaped
//! (encoding, signing, the RPC wire format) lives behind this trait;
//! the submission and event layers only consume its outputs.

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};

use crate::error::TxError;
use crate::types::{AccountId, ChainEvent, Extrinsic, Signer, TxUpdate};

/// Connection to a chain, as exposed by the external SDK.
#[async_trait]
pub trait ChainApi: Send + Sync {
    /// The chain's next account index for `address` (the nonce floor
    /// when no cached value exists).
    async fn account_next_index(&self, address: &AccountId) -> Result<u64, TxError>;

    /// Signs and submits `extrinsic`, returning the watch stream of
    /// status updates for this submission.
    ///
    /// A `None` nonce lets the SDK pick one. Submission-layer rejections
    /// (pool errors) surface either as an `Err` here or as an
    /// error-flagged [`TxUpdate`] on the stream, depending on when the
    /// SDK learns about them.
    async fn submit_and_watch(
        &self,
        extrinsic: &Extrinsic,
        signer: &Signer,
        nonce: Option<u64>,
    ) -> Result<mpsc::Receiver<TxUpdate>, TxError>;

    /// Subscribes to the chain's system event batches (one batch per
    /// block).
    fn system_events(&self) -> broadcast::Receiver<Vec<ChainEvent>>;

    /// Resolves a signing identity from a derivation URI (e.g.
    /// "//Alice") via the SDK's keyring.
    fn signer_from_uri(&self, name: &str, uri: &str) -> Result<Signer, TxError>;
}
