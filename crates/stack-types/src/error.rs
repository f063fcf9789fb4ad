//! # Stack Error Taxonomy
//!
//! Errors raised by the stack lifecycle. Startup failures carry the
//! component that failed so operators can tell which binary to look at.

use std::time::Duration;

use thiserror::Error;

use crate::component::ComponentName;

/// Errors from stack process management.
#[derive(Debug, Error)]
pub enum StackError {
    /// `start_stack` was called while a stack is already tracked.
    #[error("Stack processes already started")]
    AlreadyStarted,

    /// `stop_stack` was called before any stack was started.
    #[error("Stack was not started yet")]
    NotStarted,

    /// A component emitted an error-matching line during startup.
    #[error("Failed to start {component} component: {line:?}")]
    StartupFailed {
        component: ComponentName,
        /// The output line that matched the error predicate, or a short
        /// description when the process exited without output.
        line: String,
    },

    /// A component produced neither a ready nor an error line in time.
    #[error("Timed out after {timeout:?} waiting for {component} component to start")]
    StartupTimeout {
        component: ComponentName,
        timeout: Duration,
    },

    /// Filesystem or spawn-level failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Signal delivery to a child process failed.
    #[error("Failed to signal {component} component: {source}")]
    Signal {
        component: ComponentName,
        source: std::io::Error,
    },
}
