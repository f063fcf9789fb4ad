//! # Binary Spawner
//!
//! Spawns one external binary with captured output and resolves once a
//! caller-supplied readiness predicate matches a line of output.
//!
//! The settlement race: the first of
//!
//! 1. an output line matching `is_ready` - resolves with the handle,
//! 2. an output line matching `is_error` - rejects with a startup failure,
//! 3. the configured timeout - rejects with a timeout error
//!
//! wins; later lines no longer affect settlement. Output keeps being
//! drained after settlement so the child never blocks on a full pipe, and
//! in [`SpawnMode::Foreground`] every line is mirrored to the operator
//! log with a component-tagged prefix.
//!
//! On error or timeout the child is left running. The caller owns cleanup
//! of a partially-started process.

use std::path::Path;
use std::process::Stdio;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, info};

use stack_types::{serialize_args, ComponentName, ComponentOptions, StackError};

/// How spawned components relate to the operator's console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpawnMode {
    /// Output is drained silently (visible at `debug` level only).
    #[default]
    Background,
    /// Every output line is mirrored with a component-tagged prefix.
    Foreground,
}

/// An owned, running stack component process.
#[derive(Debug)]
pub struct ProcessHandle {
    component: ComponentName,
    child: Child,
}

impl ProcessHandle {
    /// The component this process runs.
    #[must_use]
    pub fn component(&self) -> ComponentName {
        self.component
    }

    /// OS process id, if the process has not yet been reaped.
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Whether the process is still running.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Sends SIGTERM. A no-op when the process has already exited.
    pub fn terminate(&mut self) -> Result<(), StackError> {
        self.signal(Signal::SIGTERM)
    }

    /// Sends SIGKILL. A no-op when the process has already exited.
    pub fn kill(&mut self) -> Result<(), StackError> {
        self.signal(Signal::SIGKILL)
    }

    fn signal(&mut self, signal: Signal) -> Result<(), StackError> {
        if !self.is_running() {
            return Ok(());
        }
        let Some(pid) = self.child.id() else {
            return Ok(());
        };

        debug!(component = %self.component, pid, signal = %signal, "Signalling component");
        match kill(Pid::from_raw(pid as i32), signal) {
            Ok(()) => Ok(()),
            // Exited between the liveness check and the signal.
            Err(nix::errno::Errno::ESRCH) => Ok(()),
            Err(errno) => Err(StackError::Signal {
                component: self.component,
                source: std::io::Error::from_raw_os_error(errno as i32),
            }),
        }
    }

    /// Waits for the process to exit and returns its status.
    pub async fn wait(&mut self) -> Result<std::process::ExitStatus, StackError> {
        Ok(self.child.wait().await?)
    }
}

/// Spawns stack binaries and waits for their readiness markers.
#[derive(Debug, Default)]
pub struct BinarySpawner;

impl BinarySpawner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Spawns `binary_path` in `working_dir` and waits for readiness.
    ///
    /// The supplied environment is merged over the parent environment;
    /// stdin is closed, stdout and stderr are captured as UTF-8 line
    /// streams. When `log_path` is set, every output line is appended to
    /// that file as well.
    pub async fn spawn(
        &self,
        component: ComponentName,
        binary_path: &Path,
        working_dir: &Path,
        options: &ComponentOptions,
        mode: SpawnMode,
        log_path: Option<&Path>,
        is_ready: impl Fn(&str) -> bool,
        is_error: impl Fn(&str) -> bool,
    ) -> Result<ProcessHandle, StackError> {
        let mut child = Command::new(binary_path)
            .args(serialize_args(&options.args))
            .envs(&options.envs)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let (line_tx, mut line_rx) = mpsc::channel::<String>(256);
        if let Some(stdout) = child.stdout.take() {
            watch_lines(stdout, line_tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            watch_lines(stderr, line_tx);
        }

        let mut log_file = match log_path {
            Some(path) => Some(
                tokio::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .await?,
            ),
            None => None,
        };

        info!(
            component = %component,
            timeout_secs = options.timeout.as_secs_f64(),
            "Waiting for component to start"
        );

        let deadline = tokio::time::sleep(options.timeout);
        tokio::pin!(deadline);

        let settled = loop {
            tokio::select! {
                () = &mut deadline => {
                    break Err(StackError::StartupTimeout {
                        component,
                        timeout: options.timeout,
                    });
                }
                line = line_rx.recv() => match line {
                    Some(line) => {
                        emit_line(component, mode, &line, &mut log_file).await;
                        if is_ready(&line) {
                            info!(component = %component, "Component started");
                            break Ok(());
                        }
                        if is_error(&line) {
                            break Err(StackError::StartupFailed { component, line });
                        }
                    }
                    None => {
                        break Err(StackError::StartupFailed {
                            component,
                            line: "process exited during startup".to_owned(),
                        });
                    }
                }
            }
        };

        // Keep draining output regardless of how the race settled, so the
        // child never stalls on a full pipe.
        tokio::spawn(async move {
            while let Some(line) = line_rx.recv().await {
                emit_line(component, mode, &line, &mut log_file).await;
            }
        });

        settled?;
        Ok(ProcessHandle { component, child })
    }
}

/// Forwards lines from one output pipe into the merged line channel.
fn watch_lines(reader: impl AsyncRead + Unpin + Send + 'static, tx: mpsc::Sender<String>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });
}

async fn emit_line(
    component: ComponentName,
    mode: SpawnMode,
    line: &str,
    log_file: &mut Option<tokio::fs::File>,
) {
    match mode {
        SpawnMode::Foreground => info!("[{component}] {line}"),
        SpawnMode::Background => debug!("[{component}] {line}"),
    }
    if let Some(file) = log_file {
        let _ = file.write_all(line.as_bytes()).await;
        let _ = file.write_all(b"\n").await;
    }
}
