//! # Chain Client - Transaction Submission and Event Dispatch
//!
//! The chain-facing half of devstack: everything between "I have a signed
//! call" and "it is on chain (or definitively is not)".
//!
//! ## Components
//!
//! - [`ChainApi`] - the seam to the external chain SDK: nonce queries,
//!   submit-and-watch, and the system event feed
//! - [`TxHandler`] - submit one extrinsic and track it through the
//!   multi-stage commit lifecycle with transient-failure retries
//! - [`TxQueue`] - [`TxHandler`] plus serialized per-account nonce
//!   allocation, for safe concurrent submission from one account
//! - [`EventQueue`] - one-shot handler registry over the chain's system
//!   events
//! - [`RetryPolicy`] - the weighted attempt budget as data: which
//!   failure classes are retried and what each costs
//!
//! ## Failure Model
//!
//! Submission under contention is inherently racy: the retry loop
//! absorbs exactly the three known-transient failure classes (mempool
//! priority, stale transaction, watch timeout) and surfaces everything
//! else untouched. Exhausting the attempt budget raises
//! [`TxError::AttemptsExhausted`], distinct from any underlying chain
//! error.

pub mod api;
pub mod error;
pub mod events;
pub mod handler;
pub mod queue;
pub mod retry;
pub mod types;

pub use api::ChainApi;
pub use error::TxError;
pub use events::{ArgFilters, ArgMatch, EventQueue};
pub use handler::TxHandler;
pub use queue::TxQueue;
pub use retry::{AttemptBudget, FailureKind, RetryPolicy};
pub use types::{
    AccountId, ChainEvent, Extrinsic, ExtrinsicStatus, Signer, TxResult, TxUpdate,
};
