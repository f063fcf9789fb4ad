//! # Stack Fixture
//!
//! Builds a temporary stack root with scripted stand-ins for the three
//! stack binaries. Scripts run under `/bin/sh` and typically echo their
//! component's readiness banner, then sleep; they can also append to
//! `<root>/order.log` (reachable as `../../order.log` from a component
//! working directory) so tests can assert start and stop ordering.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use stack_types::{ComponentName, StackConfig};

/// Banner lines matching each component's readiness marker.
pub const NODE_BANNER: &str = "Running JSON-RPC server: addr=127.0.0.1:9944";
pub const PRUNTIME_BANNER: &str = "Rocket has launched from http://0.0.0.0:8000";
pub const PHERRY_BANNER: &str = "pRuntime get_info response: PhactoryInfo { initialized: true }";

/// A temporary stack root with scripted component binaries.
pub struct StackFixture {
    root: TempDir,
}

impl StackFixture {
    /// A fixture where every component starts cleanly, records itself in
    /// `order.log`, and handles SIGTERM by recording `<name>-stop`.
    pub fn healthy() -> Self {
        let fixture = Self::empty();
        for component in ComponentName::START_ORDER {
            fixture.install_script(component, &well_behaved_script(component));
        }
        fixture
    }

    /// A fixture with no binaries installed; use `install_script`.
    pub fn empty() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(root.path().join("bin")).expect("bin dir");
        Self { root }
    }

    /// The stack root path.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// A stack config with short startup timeouts suited to scripts.
    pub fn config(&self) -> StackConfig {
        let mut config = StackConfig::default();
        for component in [
            &mut config.node,
            &mut config.pruntime,
            &mut config.pherry,
        ] {
            component.args.clear();
            component.envs.clear();
            component.timeout = Duration::from_secs(5);
        }
        config
    }

    /// Installs (or replaces) one component's scripted binary.
    pub fn install_script(&self, component: ComponentName, body: &str) {
        let path = self.binary_path(component);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    }

    /// Path of one component's binary.
    pub fn binary_path(&self, component: ComponentName) -> PathBuf {
        self.root.path().join("bin").join(component.as_str())
    }

    /// Lines of `order.log`, empty when nothing was recorded yet.
    pub fn order_log(&self) -> Vec<String> {
        match std::fs::read_to_string(self.root.path().join("order.log")) {
            Ok(content) => content.lines().map(str::to_owned).collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// The banner line for a component.
pub fn banner(component: ComponentName) -> &'static str {
    match component {
        ComponentName::Node => NODE_BANNER,
        ComponentName::Pruntime => PRUNTIME_BANNER,
        ComponentName::Pherry => PHERRY_BANNER,
    }
}

fn well_behaved_script(component: ComponentName) -> String {
    let name = component.as_str();
    let banner = banner(component);
    // Working directory is <root>/.data/<name>; order.log sits two
    // levels up, at the stack root. `sleep 30 & wait` lets the TERM
    // trap run promptly.
    format!(
        "echo {name} >> ../../order.log\n\
         trap 'echo {name}-stop >> ../../order.log; exit 0' TERM\n\
         echo \"{banner}\"\n\
         sleep 30 &\n\
         wait $!"
    )
}
