//! Android device bridge.
//!
//! Runs benchmarks on a connected device: a scratch directory is set up
//! under `/data/local/tmp`, the headless binary and its assets are
//! pushed, the run happens through `adb shell`, and the stat file is
//! pulled back to the host.

use std::path::Path;
use std::process::Command;

use crate::error::BenchError;

/// Wrapper around the `adb` command line for one remote scratch directory.
#[derive(Debug, Clone)]
pub struct DeviceBridge {
    remote_dir: String,
}

impl DeviceBridge {
    /// Default scratch directory on the device.
    pub const DEFAULT_REMOTE_DIR: &'static str = "/data/local/tmp/kiln";

    /// Create a bridge rooted at the given remote directory.
    pub fn new(remote_dir: impl Into<String>) -> Self {
        Self {
            remote_dir: remote_dir.into(),
        }
    }

    /// The remote scratch directory.
    pub fn remote_dir(&self) -> &str {
        &self.remote_dir
    }

    /// Join a name onto the remote scratch directory.
    pub fn remote_path(&self, name: &str) -> String {
        format!("{}/{}", self.remote_dir, name)
    }

    /// Create the scratch directory layout on the device.
    pub fn prepare(&self) -> Result<(), BenchError> {
        self.adb(&["shell", "mkdir", "-p", &self.remote_dir])?;
        self.adb(&["shell", "mkdir", "-p", &self.remote_path("cache")])?;
        self.adb(&["shell", "mkdir", "-p", &self.remote_path("assets")])
    }

    /// Push a local file or directory to the device.
    pub fn push(&self, local: &Path, remote: &str) -> Result<(), BenchError> {
        let local = local.display().to_string();
        self.adb(&["push", &local, remote])
    }

    /// Push a binary and mark it executable.
    pub fn push_executable(&self, local: &Path, remote: &str) -> Result<(), BenchError> {
        self.push(local, remote)?;
        self.adb(&["shell", "chmod", "+x", remote])
    }

    /// Pull a remote file back to the host.
    pub fn pull(&self, remote: &str, local: &Path) -> Result<(), BenchError> {
        let local = local.display().to_string();
        self.adb(&["pull", remote, &local])
    }

    /// Run a command on the device.
    pub fn shell(&self, command: &[String]) -> Result<(), BenchError> {
        let mut args = vec!["shell"];
        args.extend(command.iter().map(String::as_str));
        self.adb(&args)
    }

    /// Remove the scratch directory from the device.
    pub fn cleanup(&self) -> Result<(), BenchError> {
        self.adb(&["shell", "rm", "-r", &self.remote_dir])
    }

    fn adb(&self, args: &[&str]) -> Result<(), BenchError> {
        log::debug!("adb {}", args.join(" "));
        let status = Command::new("adb").args(args).status()?;
        if !status.success() {
            return Err(BenchError::CommandFailed {
                command: format!("adb {}", args.join(" ")),
                code: status.code(),
            });
        }
        Ok(())
    }
}

impl Default for DeviceBridge {
    fn default() -> Self {
        Self::new(Self::DEFAULT_REMOTE_DIR)
    }
}
