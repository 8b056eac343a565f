use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::config::NvidiaSmiConfig;
use crate::error::{Error, Result};

/// Captured result of one nvidia-smi invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
}

/// Executes the diagnostic utility with a list of arguments.
///
/// A non-zero exit status is reported through [`CommandOutput::success`],
/// not as an error. Errors are reserved for the utility being missing,
/// failing to start, or hanging past its timeout.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, args: &[&str]) -> Result<CommandOutput>;
}

pub struct SmiRunner {
    binary: PathBuf,
    timeout: Duration,
}

impl SmiRunner {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        SmiRunner {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn from_config(config: &NvidiaSmiConfig) -> Self {
        Self::new(&config.binary, config.timeout())
    }
}

impl CommandRunner for SmiRunner {
    async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        tracing::debug!(binary = %self.binary.display(), args = %args.join(" "), "running nvidia-smi");

        let child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        // Dropping the child on timeout kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| Error::Timeout {
                args: args.join(" "),
                timeout: self.timeout,
            })?
            .map_err(Error::Spawn)?;

        if !output.status.success() {
            tracing::debug!(status = %output.status, args = %args.join(" "), "nvidia-smi exited with failure");
        }

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

fn spawn_error(err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::NotFound => Error::ToolUnavailable,
        _ => Error::Spawn(err),
    }
}
