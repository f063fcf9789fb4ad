//! # Stack Runner - Local Stack Process Lifecycle
//!
//! Spawns and supervises the three-component dev stack (chain node,
//! secure runtime, bridge relay).
//!
//! ## Components
//!
//! - [`BinarySpawner`] - spawns one external binary and resolves once a
//!   readiness marker appears in its output (or fails on an error marker
//!   or timeout)
//! - [`StackManager`] - orchestrates the fixed component set: clean
//!   working directories, start order, reverse-order teardown with
//!   SIGTERM/SIGKILL escalation
//! - [`ProcessHandle`] - an owned child process with graceful and forced
//!   signal delivery
//!
//! ## Failure Semantics
//!
//! Startup failures are surfaced, never absorbed: a component that emits
//! an error line or misses its readiness timeout fails `start_stack`, and
//! already-started siblings are left running. The caller invokes
//! [`StackManager::stop_stack`] on the error path.

pub mod manager;
pub mod spawner;

pub use manager::{StackManager, StackProcesses, StartStackOptions};
pub use spawner::{BinarySpawner, ProcessHandle, SpawnMode};
