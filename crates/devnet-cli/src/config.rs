//! CLI configuration file handling.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use stack_types::StackConfig;

/// Top-level `devstack.json` shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Where the stack binaries and state live.
    pub stack_root: PathBuf,

    /// Per-component launch configuration.
    pub stack: StackConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            stack_root: PathBuf::from("./stack"),
            stack: StackConfig::default(),
        }
    }
}

impl CliConfig {
    /// Loads the config file, falling back to defaults when it does not
    /// exist. A present-but-invalid file is an error, not a fallback.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}
