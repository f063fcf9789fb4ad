//! # Stack Types - Shared Vocabulary for the Local Stack
//!
//! Dependency-light types consumed by every other workspace member:
//!
//! - [`ComponentName`] - the fixed set of stack components and their order
//! - [`ArgMap`] / [`ArgValue`] - process argument maps and their
//!   command-line serialization
//! - [`StackConfig`] / [`ComponentOptions`] - per-component launch
//!   configuration with dev-mode defaults
//! - [`StackError`] - the stack lifecycle error taxonomy

pub mod args;
pub mod component;
pub mod config;
pub mod error;

pub use args::{serialize_args, ArgMap, ArgValue};
pub use component::ComponentName;
pub use config::{ComponentOptions, StackConfig};
pub use error::StackError;
