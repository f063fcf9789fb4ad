//! # Dev Phase
//!
//! One test session against a running devnet stack. The phase value is
//! constructed by the caller and passed where needed; nothing in this
//! crate is looked up through process-wide state.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use chain_client::{ChainApi, EventQueue, Signer, TxQueue};

use crate::accounts::{AccountsConfig, AccountsError, DevAccounts};
use crate::factory::ContractFactory;

/// Options for setting up a phase.
#[derive(Debug, Clone, Default)]
pub struct DevPhaseOptions {
    /// Keyring configuration.
    pub accounts: AccountsConfig,
}

/// Errors from phase setup.
#[derive(Debug, Error)]
pub enum DevPhaseError {
    #[error(transparent)]
    Accounts(#[from] AccountsError),
}

/// A wired devnet session: chain connection, transaction queue, event
/// queue and the resolved dev accounts.
pub struct DevPhase {
    api: Arc<dyn ChainApi>,
    tx_queue: TxQueue,
    event_queue: EventQueue,
    accounts: DevAccounts,
}

impl DevPhase {
    /// Wires a phase over an established chain connection: resolves the
    /// dev accounts and subscribes the event queue to the chain's
    /// system events.
    pub fn setup(api: Arc<dyn ChainApi>, options: &DevPhaseOptions) -> Result<Self, DevPhaseError> {
        let accounts = DevAccounts::resolve(api.as_ref(), &options.accounts)?;

        let mut event_queue = EventQueue::new();
        event_queue.init(api.system_events());

        let tx_queue = TxQueue::new(api.clone());

        info!(sudo = %accounts.sudo().name, "Dev phase ready");
        Ok(Self {
            api,
            tx_queue,
            event_queue,
            accounts,
        })
    }

    /// The underlying chain connection.
    #[must_use]
    pub fn api(&self) -> &Arc<dyn ChainApi> {
        &self.api
    }

    /// The nonce-serializing transaction queue for this session.
    #[must_use]
    pub fn tx_queue(&self) -> &TxQueue {
        &self.tx_queue
    }

    /// The one-shot event queue for this session.
    #[must_use]
    pub fn event_queue(&self) -> &EventQueue {
        &self.event_queue
    }

    /// The resolved dev accounts.
    #[must_use]
    pub fn accounts(&self) -> &DevAccounts {
        &self.accounts
    }

    /// The sudo signer.
    #[must_use]
    pub fn sudo(&self) -> &Signer {
        self.accounts.sudo()
    }

    /// A contract factory over this phase.
    #[must_use]
    pub fn contract_factory(&self) -> ContractFactory<'_> {
        ContractFactory::new(self)
    }

    /// Tears the session down: stops event dispatch. The chain
    /// connection itself is owned by the caller.
    pub fn cleanup(&mut self) {
        self.event_queue.shutdown();
        info!("Dev phase cleaned up");
    }
}
