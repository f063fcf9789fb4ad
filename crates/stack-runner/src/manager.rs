//! # Stack Manager
//!
//! Orchestrates the three fixed stack components over [`BinarySpawner`]:
//! node, then pruntime, then pherry, each awaited to readiness before the
//! next is spawned. Teardown signals components in reverse order.
//!
//! Startup failure of a later component does NOT roll back its started
//! siblings: the error names the failed component and the caller decides
//! whether to `stop_stack`. Every CLI call site does so in its error
//! path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use stack_types::{ArgValue, ComponentName, ComponentOptions, StackConfig, StackError};

use crate::spawner::{BinarySpawner, ProcessHandle, SpawnMode};

/// Readiness banner of the chain node's RPC server.
const NODE_READY_MARKER: &str = "Running JSON-RPC";
/// Readiness banner of the secure runtime's HTTP server.
const PRUNTIME_READY_MARKER: &str = "Rocket has launched from";
/// First worker-info response logged by the relay once it can reach both
/// the node and the runtime.
const PHERRY_READY_MARKER: &str = "pRuntime get_info response: PhactoryInfo";

/// The readiness marker for a component's startup banner.
#[must_use]
pub fn ready_marker(component: ComponentName) -> &'static str {
    match component {
        ComponentName::Node => NODE_READY_MARKER,
        ComponentName::Pruntime => PRUNTIME_READY_MARKER,
        ComponentName::Pherry => PHERRY_READY_MARKER,
    }
}

/// Whether an output line marks the component as ready.
#[must_use]
pub fn is_ready_line(component: ComponentName, line: &str) -> bool {
    line.contains(ready_marker(component))
}

/// Whether an output line marks a startup error. Shared by all three
/// components: any line containing "error", case-insensitively.
#[must_use]
pub fn is_error_line(line: &str) -> bool {
    line.to_lowercase().contains("error")
}

/// Options for one `start_stack` run.
#[derive(Debug, Clone, Default)]
pub struct StartStackOptions {
    /// Tee every component's output to `<stack_root>/logs/<component>.log`.
    pub save_logs: bool,

    /// Block production interval override for Background mode. Defaults
    /// to 100ms so tests are not paced by the 6s production interval.
    pub block_time: Option<Duration>,
}

/// Handles of the started components.
///
/// Entries are filled in start order as components come up, so a failed
/// startup still tracks the components that did start (for teardown).
#[derive(Debug, Default)]
pub struct StackProcesses {
    pub node: Option<ProcessHandle>,
    pub pruntime: Option<ProcessHandle>,
    pub pherry: Option<ProcessHandle>,
}

impl StackProcesses {
    /// The handle for a component, if it was started.
    #[must_use]
    pub fn get(&self, component: ComponentName) -> Option<&ProcessHandle> {
        match component {
            ComponentName::Node => self.node.as_ref(),
            ComponentName::Pruntime => self.pruntime.as_ref(),
            ComponentName::Pherry => self.pherry.as_ref(),
        }
    }

    fn get_mut(&mut self, component: ComponentName) -> Option<&mut ProcessHandle> {
        match component {
            ComponentName::Node => self.node.as_mut(),
            ComponentName::Pruntime => self.pruntime.as_mut(),
            ComponentName::Pherry => self.pherry.as_mut(),
        }
    }

    fn set(&mut self, component: ComponentName, handle: ProcessHandle) {
        match component {
            ComponentName::Node => self.node = Some(handle),
            ComponentName::Pruntime => self.pruntime = Some(handle),
            ComponentName::Pherry => self.pherry = Some(handle),
        }
    }
}

/// Manages the local three-component stack.
///
/// At most one process per component is tracked per manager instance;
/// starting an already-started stack is a usage error. Start and stop
/// take `&mut self`, so they cannot race on one instance.
#[derive(Debug)]
pub struct StackManager {
    stack_root: PathBuf,
    config: StackConfig,
    spawner: BinarySpawner,
    processes: Option<StackProcesses>,
}

impl StackManager {
    /// Creates a manager for binaries installed under `stack_root`.
    ///
    /// `<stack_root>/bin/<component>` must hold the component binaries;
    /// working directories are created under `<stack_root>/.data/`.
    #[must_use]
    pub fn new(stack_root: impl Into<PathBuf>, config: StackConfig) -> Self {
        Self {
            stack_root: stack_root.into(),
            config,
            spawner: BinarySpawner::new(),
            processes: None,
        }
    }

    /// The configured stack root.
    #[must_use]
    pub fn stack_root(&self) -> &Path {
        &self.stack_root
    }

    /// Handles of the currently tracked stack, if one was started.
    #[must_use]
    pub fn processes(&self) -> Option<&StackProcesses> {
        self.processes.as_ref()
    }

    /// Mutable handles of the currently tracked stack (liveness checks
    /// and signalling need `&mut` on the child).
    #[must_use]
    pub fn processes_mut(&mut self) -> Option<&mut StackProcesses> {
        self.processes.as_mut()
    }

    /// Starts node, pruntime and pherry in order.
    ///
    /// # Errors
    ///
    /// - [`StackError::AlreadyStarted`] when a stack is already tracked
    /// - the failing component's [`StackError::StartupFailed`] /
    ///   [`StackError::StartupTimeout`]; components started before the
    ///   failure keep running and stay tracked - call
    ///   [`Self::stop_stack`] to tear them down
    pub async fn start_stack(
        &mut self,
        mode: SpawnMode,
        options: &StartStackOptions,
    ) -> Result<&StackProcesses, StackError> {
        if self.processes.is_some() {
            return Err(StackError::AlreadyStarted);
        }
        self.processes = Some(StackProcesses::default());

        for component in ComponentName::START_ORDER {
            let handle = self.start_component(component, mode, options).await;
            match handle {
                Ok(handle) => {
                    if let Some(processes) = self.processes.as_mut() {
                        processes.set(component, handle);
                    }
                }
                Err(error) => return Err(error),
            }
        }

        info!("Stack started");
        Ok(self.processes.get_or_insert_with(Default::default))
    }

    /// Stops the tracked stack: pherry, then pruntime, then node.
    ///
    /// Sends SIGTERM (SIGKILL when `force`), skipping components that
    /// were never started or have already exited. Signal failures are
    /// logged and do not abort the remaining teardown. The tracked set is
    /// cleared, so the stack can be started again afterwards.
    ///
    /// # Errors
    ///
    /// [`StackError::NotStarted`] when no stack was started.
    pub fn stop_stack(&mut self, force: bool) -> Result<(), StackError> {
        let Some(mut processes) = self.processes.take() else {
            return Err(StackError::NotStarted);
        };

        for component in ComponentName::START_ORDER.iter().rev() {
            let Some(handle) = processes.get_mut(*component) else {
                continue;
            };
            let result = if force {
                handle.kill()
            } else {
                handle.terminate()
            };
            if let Err(error) = result {
                warn!(component = %component, %error, "Failed to signal component");
            }
        }

        info!(force, "Stack stopped");
        Ok(())
    }

    /// Starts a single component without tracking it in the stack.
    ///
    /// Prepares a clean working directory, resolves the binary under the
    /// stack root and waits for the component's readiness marker.
    pub async fn start_component(
        &self,
        component: ComponentName,
        mode: SpawnMode,
        options: &StartStackOptions,
    ) -> Result<ProcessHandle, StackError> {
        // Mode overrides are applied to a clone; the configured base is
        // never mutated.
        let mut component_options = self.config.component(component).clone();
        apply_mode_overrides(component, mode, options, &mut component_options);

        let working_dir = self.prepare_working_dir(component).await?;
        let binary_path = self.stack_root.join("bin").join(component.as_str());

        let log_path = if options.save_logs {
            let logs_dir = self.stack_root.join("logs");
            tokio::fs::create_dir_all(&logs_dir).await?;
            Some(logs_dir.join(format!("{component}.log")))
        } else {
            None
        };

        self.spawner
            .spawn(
                component,
                &binary_path,
                &working_dir,
                &component_options,
                mode,
                log_path.as_deref(),
                |line| is_ready_line(component, line),
                is_error_line,
            )
            .await
    }

    /// Removes any previous working directory and recreates it, so each
    /// run starts from empty chain and enclave state.
    async fn prepare_working_dir(&self, component: ComponentName) -> Result<PathBuf, StackError> {
        let working_dir = self.stack_root.join(".data").join(component.as_str());
        match tokio::fs::remove_dir_all(&working_dir).await {
            Ok(()) => {}
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => return Err(error.into()),
        }
        tokio::fs::create_dir_all(&working_dir).await?;
        Ok(working_dir)
    }
}

/// Background mode runs the chain and relay on a fast block interval so
/// integration tests are not paced by production block times.
fn apply_mode_overrides(
    component: ComponentName,
    mode: SpawnMode,
    options: &StartStackOptions,
    component_options: &mut ComponentOptions,
) {
    if mode != SpawnMode::Background {
        return;
    }
    let block_millis = options
        .block_time
        .unwrap_or(Duration::from_millis(100))
        .as_millis() as u64;

    match component {
        ComponentName::Node => {
            component_options.args.insert(
                "--block-millisecs".to_owned(),
                ArgValue::from(block_millis),
            );
        }
        ComponentName::Pherry => {
            component_options.args.insert(
                "--dev-wait-block-ms".to_owned(),
                ArgValue::from(block_millis),
            );
        }
        ComponentName::Pruntime => {}
    }
}
