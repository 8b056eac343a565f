//! Querying `nvidia-smi` for GPU processes and memory.
//!
//! All process execution goes through a [`CommandRunner`]; the parsers in
//! [`process`] and [`memory`] are pure functions over captured stdout.

pub mod memory;
pub mod process;
pub mod runner;

use crate::error::{Error, Result};

pub use memory::{GpuMemory, parse_memory_query};
pub use process::{GpuProcess, MonitorSample, ProcessSource, parse_compute_apps, parse_pmon};
pub use runner::{CommandOutput, CommandRunner, SmiRunner};

pub const VERSION_ARGS: [&str; 1] = ["--version"];
pub const PMON_ARGS: [&str; 5] = ["pmon", "-c", "1", "-s", "um"];
pub const COMPUTE_APPS_ARGS: [&str; 2] = [
    "--query-compute-apps=pid,process_name,gpu_uuid,used_memory",
    "--format=csv,noheader,nounits",
];
pub const MEMORY_ARGS: [&str; 2] = [
    "--query-gpu=index,memory.used,memory.total,memory.free",
    "--format=csv,noheader,nounits",
];

/// Records parsed from one command output, plus the count of rows dropped
/// as malformed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Parsed {
            records: Vec::new(),
            skipped: 0,
        }
    }
}

pub(crate) fn split_csv(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

pub struct NvidiaSmi<R> {
    runner: R,
}

impl<R: CommandRunner> NvidiaSmi<R> {
    pub fn new(runner: R) -> Self {
        NvidiaSmi { runner }
    }

    /// True when nvidia-smi is on the path and `--version` succeeds.
    pub async fn is_available(&self) -> bool {
        match self.probe().await {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(error = %err, "nvidia-smi probe failed");
                false
            }
        }
    }

    /// `ToolUnavailable` only for a missing binary or failing `--version`;
    /// timeouts and spawn failures keep their own error.
    async fn probe(&self) -> Result<()> {
        let output = self.runner.run(&VERSION_ARGS).await?;
        if output.success {
            Ok(())
        } else {
            Err(Error::ToolUnavailable)
        }
    }

    /// Enumerate processes holding GPU memory.
    ///
    /// Uses `pmon` first and falls back to the compute-apps query when pmon
    /// fails or reports nothing. An empty list is a normal result.
    pub async fn list_processes(&self) -> Result<Vec<GpuProcess>> {
        self.probe().await?;

        let output = self.runner.run(&PMON_ARGS).await?;
        if output.success {
            let parsed = parse_pmon(&output.stdout);
            log_skipped("pmon", parsed.skipped);
            if !parsed.records.is_empty() {
                return Ok(parsed.records);
            }
            tracing::debug!("pmon reported no processes, trying compute-apps query");
        } else {
            tracing::debug!("pmon failed, trying compute-apps query");
        }

        self.list_compute_apps().await
    }

    async fn list_compute_apps(&self) -> Result<Vec<GpuProcess>> {
        let output = self.runner.run(&COMPUTE_APPS_ARGS).await?;
        if !output.success {
            return Ok(Vec::new());
        }
        let parsed = parse_compute_apps(&output.stdout);
        log_skipped("compute-apps", parsed.skipped);
        Ok(parsed.records)
    }

    /// Per-device memory usage. A failing query yields an empty list.
    pub async fn list_memory(&self) -> Result<Vec<GpuMemory>> {
        let output = self.runner.run(&MEMORY_ARGS).await?;
        if !output.success {
            return Ok(Vec::new());
        }
        let parsed = parse_memory_query(&output.stdout);
        log_skipped("memory", parsed.skipped);
        Ok(parsed.records)
    }
}

fn log_skipped(query: &str, skipped: usize) {
    if skipped > 0 {
        tracing::debug!(query, skipped, "skipped malformed nvidia-smi rows");
    }
}
