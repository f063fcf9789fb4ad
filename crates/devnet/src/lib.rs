//! # Devnet - Integration-Test Facade
//!
//! Caller-constructed wiring of the chain client for a local devnet:
//!
//! - [`DevAccounts`] - the standard dev keyring (alice..ferdie)
//! - [`DevPhase`] - one test session against a running stack: chain
//!   connection, transaction queue, event queue and accounts in one
//!   explicitly-passed value
//! - [`ContractFactory`] - deploy/instantiate flows driving the
//!   transaction queue and the one-shot event waiters

pub mod accounts;
pub mod factory;
pub mod phase;

pub use accounts::{AccountsConfig, AccountsError, DevAccounts};
pub use factory::{ContractFactory, FactoryError};
pub use phase::{DevPhase, DevPhaseError, DevPhaseOptions};
