use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TermSignal {
    /// SIGTERM; the target may intercept or ignore it.
    Graceful,
    /// SIGKILL.
    Force,
}

impl TermSignal {
    pub fn from_force(force: bool) -> Self {
        if force {
            TermSignal::Force
        } else {
            TermSignal::Graceful
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TermSignal::Graceful => "SIGTERM",
            TermSignal::Force => "SIGKILL",
        }
    }

    fn as_sysinfo(self) -> Signal {
        match self {
            TermSignal::Graceful => Signal::Term,
            TermSignal::Force => Signal::Kill,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KillResult {
    Success(u32, &'static str),
    Failed(u32, String),
    NotFound(u32),
}

/// Delivers termination signals to OS processes.
pub trait Signaller {
    fn signal(&mut self, pid: u32, signal: TermSignal) -> KillResult;
}

/// [`Signaller`] backed by `sysinfo`, refreshing only the targeted pid.
pub struct SysinfoSignaller {
    sys: System,
}

impl Default for SysinfoSignaller {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoSignaller {
    pub fn new() -> Self {
        SysinfoSignaller { sys: System::new() }
    }
}

impl Signaller for SysinfoSignaller {
    fn signal(&mut self, pid: u32, signal: TermSignal) -> KillResult {
        let pids = [Pid::from_u32(pid)];
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&pids),
            true,
            ProcessRefreshKind::nothing(),
        );
        kill_process(&self.sys, pid, signal)
    }
}

pub fn kill_process(sys: &System, pid: u32, signal: TermSignal) -> KillResult {
    let sysinfo_pid = Pid::from_u32(pid);
    match sys.process(sysinfo_pid) {
        Some(process) => {
            let signal_name = signal.name();
            match process.kill_with(signal.as_sysinfo()) {
                Some(true) => KillResult::Success(pid, signal_name),
                Some(false) => KillResult::Failed(
                    pid,
                    format!("Failed to send {signal_name} to PID {pid} (permission denied?)"),
                ),
                None => {
                    // Signal not supported on this platform, fall back to kill()
                    if process.kill() {
                        KillResult::Success(pid, signal_name)
                    } else {
                        KillResult::Failed(
                            pid,
                            format!("Failed to kill PID {pid} (permission denied?)"),
                        )
                    }
                }
            }
        }
        None => KillResult::NotFound(pid),
    }
}
