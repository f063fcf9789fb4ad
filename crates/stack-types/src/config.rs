//! # Stack Configuration
//!
//! Launch configuration for the three stack components. Defaults match
//! the dev-mode invocation the stack binaries document; a config file can
//! override any subset of fields. Configuration is plain data handed to
//! constructors by the caller, never looked up ambiently.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::args::{ArgMap, ArgValue};
use crate::component::ComponentName;

/// Launch options for a single component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentOptions {
    /// Command-line arguments, keyed by flag name.
    pub args: ArgMap,

    /// Extra environment variables, merged over the parent environment.
    pub envs: BTreeMap<String, String>,

    /// How long to wait for the readiness marker before giving up.
    #[serde(rename = "timeout_ms", with = "duration_millis")]
    pub timeout: Duration,
}

impl Default for ComponentOptions {
    fn default() -> Self {
        Self {
            args: ArgMap::new(),
            envs: BTreeMap::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Configuration for the whole stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Chain node options.
    pub node: ComponentOptions,
    /// Secure runtime options.
    pub pruntime: ComponentOptions,
    /// Bridge relay options.
    pub pherry: ComponentOptions,
}

impl StackConfig {
    /// Options for the given component.
    #[must_use]
    pub fn component(&self, component: ComponentName) -> &ComponentOptions {
        match component {
            ComponentName::Node => &self.node,
            ComponentName::Pruntime => &self.pruntime,
            ComponentName::Pherry => &self.pherry,
        }
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        let node = ComponentOptions {
            args: arg_map(&[
                ("--dev", ArgValue::from(true)),
                ("--rpc-methods", ArgValue::from("Unsafe")),
                ("--block-millisecs", ArgValue::from(6000u64)),
            ]),
            envs: BTreeMap::new(),
            timeout: Duration::from_secs(10),
        };

        let pruntime = ComponentOptions {
            args: arg_map(&[
                ("--allow-cors", ArgValue::from(true)),
                ("--cores", ArgValue::from(0u64)),
                ("--port", ArgValue::from(8000u64)),
            ]),
            envs: BTreeMap::new(),
            timeout: Duration::from_secs(2),
        };

        let pherry = ComponentOptions {
            args: arg_map(&[
                ("--no-wait", ArgValue::from(true)),
                ("--mnemonic", ArgValue::from("//Alice")),
                (
                    "--inject-key",
                    ArgValue::from(
                        "0000000000000000000000000000000000000000000000000000000000000001",
                    ),
                ),
                (
                    "--substrate-ws-endpoint",
                    ArgValue::from("ws://localhost:9944"),
                ),
                ("--pruntime-endpoint", ArgValue::from("http://localhost:8000")),
                ("--dev-wait-block-ms", ArgValue::from(1000u64)),
            ]),
            envs: BTreeMap::new(),
            timeout: Duration::from_secs(2),
        };

        Self {
            node,
            pruntime,
            pherry,
        }
    }
}

fn arg_map(entries: &[(&str, ArgValue)]) -> ArgMap {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
