//! Command-line surface of the `devstack` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Developer tooling for the local contracts stack.
#[derive(Parser)]
#[command(name = "devstack", version, about)]
pub struct Args {
    /// Configuration file; defaults apply when the file is absent.
    #[arg(short, long, default_value = "devstack.json", value_hint = ValueHint::FilePath, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Manage the local three-component stack
    Stack {
        #[command(subcommand)]
        command: StackCmd,
    },
}

#[derive(Subcommand)]
pub enum StackCmd {
    /// Start the stack and keep it running until Ctrl-C
    Run {
        /// Mirror component output to the console
        #[arg(short, long)]
        foreground: bool,

        /// Tee component output to <stack_root>/logs/
        #[arg(long)]
        save_logs: bool,

        /// Block production interval in milliseconds (background mode)
        #[arg(long)]
        block_time_ms: Option<u64>,
    },

    /// Print the effective stack configuration
    ShowConfig,
}
