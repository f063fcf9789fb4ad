//! # Contract Factory
//!
//! Deploy and instantiate flows over the transaction queue, coupled to
//! the event queue for the asynchronous half of instantiation: the
//! instantiate extrinsic only starts the process, the contract becomes
//! usable when the chain emits the matching `Instantiated` event.

use std::time::Duration;

use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

use chain_client::{ArgFilters, ArgMatch, Extrinsic, Signer, TxError, TxResult};

use crate::phase::DevPhase;

/// How long to wait for the cluster to report instantiation after the
/// extrinsic is included.
const INSTANTIATION_TIMEOUT: Duration = Duration::from_secs(20);

/// Errors from contract deployment flows.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// The underlying extrinsic failed.
    #[error(transparent)]
    Tx(#[from] TxError),

    /// The inclusion result did not carry the expected event.
    #[error("Expected {0} event was not emitted")]
    MissingEvent(&'static str),

    /// The chain accepted the instantiate extrinsic but never reported
    /// the contract as instantiated.
    #[error("Timed out waiting for contract {contract_id} instantiation")]
    InstantiationTimeout { contract_id: String },
}

/// Contract deployment flows for one [`DevPhase`].
pub struct ContractFactory<'p> {
    phase: &'p DevPhase,
}

impl<'p> ContractFactory<'p> {
    #[must_use]
    pub(crate) fn new(phase: &'p DevPhase) -> Self {
        Self { phase }
    }

    /// Uploads contract code to the devnet cluster.
    pub async fn deploy(
        &self,
        code: &[u8],
        signer: &Signer,
    ) -> Result<TxResult, FactoryError> {
        let extrinsic = Extrinsic::new(
            "contracts",
            "uploadCode",
            json!({ "code": hex_encode(code) }),
        );

        let result = self
            .phase
            .tx_queue()
            .submit(&extrinsic, signer, false)
            .await?;
        info!(code_len = code.len(), "Contract code uploaded");
        Ok(result)
    }

    /// Instantiates an uploaded contract and waits until the chain
    /// reports it live.
    ///
    /// Returns the contract id from the `Instantiating` event of the
    /// inclusion result.
    pub async fn instantiate(
        &self,
        code_hash: &str,
        constructor: &str,
        salt: u64,
        signer: &Signer,
    ) -> Result<String, FactoryError> {
        let extrinsic = Extrinsic::new(
            "contracts",
            "instantiateContract",
            json!({
                "codeHash": code_hash,
                "constructor": constructor,
                "salt": format!("{salt:#x}"),
            }),
        );

        let result = self
            .phase
            .tx_queue()
            .submit(&extrinsic, signer, false)
            .await?;

        let contract_id = result
            .find_event("contracts", "Instantiating")
            .and_then(|event| event.args.first())
            .and_then(|arg| arg.as_str())
            .ok_or(FactoryError::MissingEvent("contracts.Instantiating"))?
            .to_owned();
        debug!(%contract_id, "Contract instantiating");

        let mut filters = ArgFilters::new();
        filters.insert(0, ArgMatch::Equals(json!(contract_id)));
        let instantiated = self
            .phase
            .event_queue()
            .wait_for("contracts.Instantiated", filters)
            .await;

        match tokio::time::timeout(INSTANTIATION_TIMEOUT, instantiated).await {
            Ok(Ok(_event)) => {
                info!(%contract_id, "Contract instantiated");
                Ok(contract_id)
            }
            _ => Err(FactoryError::InstantiationTimeout { contract_id }),
        }
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
