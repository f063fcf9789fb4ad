//! Command execution.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info};

use stack_runner::{SpawnMode, StackManager, StartStackOptions};

use crate::cmd::{Args, Cmd, StackCmd};
use crate::config::CliConfig;

impl Args {
    pub async fn exec(self) -> Result<()> {
        let config = CliConfig::load(&self.config)?;

        match self.command {
            Cmd::Stack { command } => match command {
                StackCmd::Run {
                    foreground,
                    save_logs,
                    block_time_ms,
                } => run_stack(config, foreground, save_logs, block_time_ms).await,
                StackCmd::ShowConfig => {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                    Ok(())
                }
            },
        }
    }
}

async fn run_stack(
    config: CliConfig,
    foreground: bool,
    save_logs: bool,
    block_time_ms: Option<u64>,
) -> Result<()> {
    let mode = if foreground {
        SpawnMode::Foreground
    } else {
        SpawnMode::Background
    };
    let options = StartStackOptions {
        save_logs,
        block_time: block_time_ms.map(Duration::from_millis),
    };

    let mut manager = StackManager::new(config.stack_root, config.stack);

    // Startup does not roll partially-started components back; the
    // error path here is the teardown.
    if let Err(startup_error) = manager.start_stack(mode, &options).await {
        error!(%startup_error, "Stack startup failed, stopping started components");
        if let Err(stop_error) = manager.stop_stack(false) {
            error!(%stop_error, "Teardown after failed startup also failed");
        }
        return Err(startup_error).context("starting stack");
    }

    info!("Stack is running, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl-C")?;

    info!("Stopping stack");
    manager.stop_stack(false).context("stopping stack")?;
    Ok(())
}
