use std::collections::HashSet;
use std::io::Write;
use std::time::Duration;

use crate::error::Result;
use crate::format::format_dry_run_line;
use crate::smi::{CommandRunner, GpuProcess, NvidiaSmi};
use crate::system::kill::{KillResult, Signaller, TermSignal};

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone, Debug)]
pub struct ClearRequest {
    /// Device ids to target; empty targets every device.
    pub devices: HashSet<String>,
    pub exclude_pids: HashSet<String>,
    pub force: bool,
    pub dry_run: bool,
    /// Pause after a successful kill so the driver can release memory
    /// before the next status query.
    pub settle_delay: Duration,
}

impl Default for ClearRequest {
    fn default() -> Self {
        ClearRequest {
            devices: HashSet::new(),
            exclude_pids: HashSet::new(),
            force: false,
            dry_run: false,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClearOutcome {
    pub found: usize,
    pub terminated: usize,
}

pub fn filter_processes(
    processes: Vec<GpuProcess>,
    devices: &HashSet<String>,
    exclude_pids: &HashSet<String>,
) -> Vec<GpuProcess> {
    processes
        .into_iter()
        .filter(|p| devices.is_empty() || devices.contains(&p.device_id))
        .filter(|p| !exclude_pids.contains(&p.pid))
        .collect()
}

/// Terminate the GPU processes selected by `request`.
///
/// Dry runs list the candidates on `out` and never signal. Per-process
/// failures (bad pid, vanished process, permission denied) are logged and
/// counted as not terminated; they never abort the batch.
pub async fn clear_gpu_memory<R, S, W>(
    smi: &NvidiaSmi<R>,
    signaller: &mut S,
    request: &ClearRequest,
    out: &mut W,
) -> Result<ClearOutcome>
where
    R: CommandRunner,
    S: Signaller,
    W: Write,
{
    let processes = smi.list_processes().await?;
    if processes.is_empty() {
        tracing::debug!("No GPU processes found");
        return Ok(ClearOutcome::default());
    }

    let targets = filter_processes(processes, &request.devices, &request.exclude_pids);
    let found = targets.len();

    if request.dry_run {
        writeln!(out, "DRY RUN: Would terminate {found} processes:")?;
        for process in &targets {
            writeln!(out, "{}", format_dry_run_line(process))?;
        }
        return Ok(ClearOutcome {
            found,
            terminated: 0,
        });
    }

    let signal = TermSignal::from_force(request.force);
    let terminated = targets
        .iter()
        .filter(|process| terminate(signaller, process, signal))
        .count();

    if terminated > 0 && !request.settle_delay.is_zero() {
        tokio::time::sleep(request.settle_delay).await;
    }

    Ok(ClearOutcome { found, terminated })
}

fn terminate<S: Signaller>(signaller: &mut S, process: &GpuProcess, signal: TermSignal) -> bool {
    let Ok(pid) = process.pid.parse::<u32>() else {
        tracing::debug!(pid = %process.pid, "Failed to terminate process: not a numeric pid");
        return false;
    };

    match signaller.signal(pid, signal) {
        KillResult::Success(pid, signal_name) => {
            tracing::info!(pid, signal = signal_name, command = %process.command, "Terminated process");
            true
        }
        KillResult::Failed(pid, reason) => {
            tracing::debug!(pid, %reason, "Failed to terminate process");
            false
        }
        KillResult::NotFound(pid) => {
            tracing::debug!(pid, "Failed to terminate process: no such process");
            false
        }
    }
}
