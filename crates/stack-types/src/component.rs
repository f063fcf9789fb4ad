//! # Stack Components
//!
//! The local stack consists of three fixed components started in
//! dependency order: the chain node, the secure enclave runtime, and the
//! bridge relay. Binaries and working directories are resolved by
//! component name under the stack root.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one stack component.
///
/// The string form doubles as the binary name under `<stack_root>/bin/`
/// and the working-directory name under `<stack_root>/.data/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentName {
    /// The chain node.
    Node,
    /// The secure enclave runtime.
    Pruntime,
    /// The bridge relay between node and runtime.
    Pherry,
}

impl ComponentName {
    /// Startup order: each component expects the previous one to be
    /// reachable. Teardown runs in reverse.
    pub const START_ORDER: [Self; 3] = [Self::Node, Self::Pruntime, Self::Pherry];

    /// The component name as used for binary and directory resolution.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Pruntime => "pruntime",
            Self::Pherry => "pherry",
        }
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
