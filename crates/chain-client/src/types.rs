//! # Chain Types
//!
//! The vocabulary shared between the transaction layer and the chain
//! SDK seam. Event argument values are dynamic (`serde_json::Value`),
//! matching what the chain's metadata-driven decoding produces.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chain account address in its string encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A signing identity resolved by the chain SDK's keyring.
///
/// Key material never crosses this API; the SDK signs with whatever this
/// record resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer {
    /// Human-readable account name (e.g. "alice").
    pub name: String,
    /// The account's address.
    pub address: AccountId,
}

/// An unsigned call description handed to the chain SDK for encoding
/// and signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extrinsic {
    /// Target pallet.
    pub pallet: String,
    /// Call name within the pallet.
    pub call: String,
    /// Call arguments; encoding is the SDK's concern.
    pub args: Value,
}

impl Extrinsic {
    #[must_use]
    pub fn new(pallet: impl Into<String>, call: impl Into<String>, args: Value) -> Self {
        Self {
            pallet: pallet.into(),
            call: call.into(),
            args,
        }
    }

    /// `pallet.call`, used for logging.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}.{}", self.pallet, self.call)
    }
}

/// Lifecycle stage of a watched extrinsic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtrinsicStatus {
    /// Validated into the local pool.
    Ready,
    /// Gossiped to peers.
    Broadcast,
    /// Included in a block.
    InBlock,
    /// The including block was finalized.
    Finalized,
    /// Finality was not reached within the chain's window; inclusion
    /// still stands.
    FinalityTimeout,
    /// Rejected as invalid by the pool.
    Invalid,
    /// Dropped from the pool.
    Dropped,
    /// The including block was retracted.
    Retracted,
    /// Replaced by another extrinsic with the same nonce.
    Usurped,
}

/// One decoded runtime event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainEvent {
    /// Emitting pallet (the event's "section").
    pub section: String,
    /// Event name within the pallet.
    pub method: String,
    /// Positional event arguments as decoded values.
    pub args: Vec<Value>,
}

impl ChainEvent {
    #[must_use]
    pub fn new(section: impl Into<String>, method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            section: section.into(),
            method: method.into(),
            args,
        }
    }

    /// The registry key, `section.method`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}.{}", self.section, self.method)
    }

    /// Whether this event is `section.method`.
    #[must_use]
    pub fn is(&self, section: &str, method: &str) -> bool {
        self.section == section && self.method == method
    }
}

/// One status update from a watched submission.
#[derive(Debug, Clone)]
pub struct TxUpdate {
    /// The lifecycle stage this update reports.
    pub status: ExtrinsicStatus,
    /// Events bundled with this update (populated at InBlock/Finalized).
    pub events: Vec<ChainEvent>,
    /// Submission-layer error reported in-band by the SDK.
    pub error: Option<String>,
}

impl TxUpdate {
    #[must_use]
    pub fn status(status: ExtrinsicStatus) -> Self {
        Self {
            status,
            events: Vec::new(),
            error: None,
        }
    }

    #[must_use]
    pub fn with_events(status: ExtrinsicStatus, events: Vec<ChainEvent>) -> Self {
        Self {
            status,
            events,
            error: None,
        }
    }
}

/// The final status object surfaced to callers.
#[derive(Debug, Clone)]
pub struct TxResult {
    /// The stage the submission settled at.
    pub status: ExtrinsicStatus,
    /// Events from the settling update, for caller inspection.
    pub events: Vec<ChainEvent>,
}

impl TxResult {
    /// Finds the first event matching `section.method`.
    #[must_use]
    pub fn find_event(&self, section: &str, method: &str) -> Option<&ChainEvent> {
        self.events.iter().find(|event| event.is(section, method))
    }
}
