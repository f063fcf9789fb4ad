//! # Devstack CLI
//!
//! Runs the local dev stack from the command line. All chain and
//! process logic lives in the library crates; this binary only parses
//! arguments, loads configuration and wires the pieces.

mod cmd;
mod config;
mod exec;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cmd::Args;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    Args::parse().exec().await
}
