//! # Dev Accounts
//!
//! The standard development keyring: well-known accounts derived from a
//! mnemonic and per-account derivation paths. Key material and address
//! derivation belong to the chain SDK; this module only tracks the
//! (name, derivation path) records and the resolved signers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use chain_client::{ChainApi, Signer, TxError};

/// Keyring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsConfig {
    /// Base mnemonic prefixed to every derivation path. Empty for the
    /// chain's built-in dev seeds.
    pub mnemonic: String,

    /// Account name -> derivation path.
    pub paths: BTreeMap<String, String>,

    /// Which account holds sudo rights on the devnet.
    pub sudo_account: String,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        let paths = ["alice", "bob", "charlie", "dave", "eve", "ferdie"]
            .into_iter()
            .map(|name| {
                let mut path = name.to_owned();
                if let Some(first) = path.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                (name.to_owned(), format!("//{path}"))
            })
            .collect();

        Self {
            mnemonic: String::new(),
            paths,
            sudo_account: "alice".to_owned(),
        }
    }
}

/// Errors from keyring resolution.
#[derive(Debug, Error)]
pub enum AccountsError {
    /// The configured sudo account has no derivation path entry.
    #[error("Unknown sudo account {0:?}")]
    UnknownSudoAccount(String),

    /// The SDK keyring failed to resolve a derivation path.
    #[error("Failed to derive account {name:?}: {source}")]
    Derivation {
        name: String,
        #[source]
        source: TxError,
    },
}

/// Resolved dev accounts for one session.
#[derive(Debug, Clone)]
pub struct DevAccounts {
    accounts: BTreeMap<String, Signer>,
    sudo: Signer,
}

impl DevAccounts {
    /// Resolves every configured account through the SDK keyring.
    pub fn resolve(api: &dyn ChainApi, config: &AccountsConfig) -> Result<Self, AccountsError> {
        let mut accounts = BTreeMap::new();
        for (name, path) in &config.paths {
            let uri = format!("{}{}", config.mnemonic, path);
            let signer =
                api.signer_from_uri(name, &uri)
                    .map_err(|source| AccountsError::Derivation {
                        name: name.clone(),
                        source,
                    })?;
            accounts.insert(name.clone(), signer);
        }

        let sudo = accounts
            .get(&config.sudo_account)
            .cloned()
            .ok_or_else(|| AccountsError::UnknownSudoAccount(config.sudo_account.clone()))?;

        Ok(Self { accounts, sudo })
    }

    /// The signer for a named account.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Signer> {
        self.accounts.get(name)
    }

    /// The sudo account's signer.
    #[must_use]
    pub fn sudo(&self) -> &Signer {
        &self.sudo
    }

    /// All account names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.accounts.keys().map(String::as_str)
    }
}
