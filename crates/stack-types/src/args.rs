//! # Process Argument Maps
//!
//! Launch arguments for stack binaries are configured as a map from flag
//! name to value rather than a flat token list, so mode-specific
//! overrides can replace individual flags without re-parsing.
//!
//! Serialization contract (matches what the stack binaries parse):
//!
//! - `Switch(true)` emits the bare flag name as a single token
//! - `Switch(false)` emits nothing (the flag is omitted)
//! - `Value(v)` emits one `name=v` token (no separate value token)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One configured argument value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// A presence flag: `true` emits the flag, `false` omits it.
    Switch(bool),
    /// A valued flag, emitted as `name=value`.
    Value(String),
    /// Numeric convenience form; serialized the same as [`ArgValue::Value`].
    Number(i64),
    /// Explicit omission (JSON `null` in config files); a config can
    /// null a defaulted flag out this way.
    Omit,
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Switch(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Value(value.to_owned())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<u64> for ArgValue {
    fn from(value: u64) -> Self {
        Self::Number(value as i64)
    }
}

/// Argument map keyed by flag name (including leading dashes).
///
/// A `BTreeMap` keeps serialization order deterministic.
pub type ArgMap = BTreeMap<String, ArgValue>;

/// Serializes an argument map into the command-line token vector.
#[must_use]
pub fn serialize_args(args: &ArgMap) -> Vec<String> {
    let mut tokens = Vec::with_capacity(args.len());
    for (name, value) in args {
        match value {
            ArgValue::Switch(true) => tokens.push(name.clone()),
            ArgValue::Switch(false) | ArgValue::Omit => {}
            ArgValue::Value(v) => tokens.push(format!("{name}={v}")),
            ArgValue::Number(n) => tokens.push(format!("{name}={n}")),
        }
    }
    tokens
}
