#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use gpu_clean::Error;
use gpu_clean::smi::{
    COMPUTE_APPS_ARGS, CommandOutput, CommandRunner, MEMORY_ARGS, PMON_ARGS, VERSION_ARGS,
};
use gpu_clean::system::kill::{KillResult, Signaller, TermSignal};

/// Replies to nvidia-smi invocations from a fixed script.
/// Unscripted invocations behave as if the binary were missing.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: HashMap<String, CommandOutput>,
    pub calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn available() -> Self {
        Self::default().reply(&VERSION_ARGS, true, "NVIDIA-SMI version  : 550.54.14\n")
    }

    pub fn reply(mut self, args: &[&str], success: bool, stdout: &str) -> Self {
        self.replies.insert(
            args.join(" "),
            CommandOutput {
                success,
                stdout: stdout.to_string(),
            },
        );
        self
    }

    pub fn pmon(self, stdout: &str) -> Self {
        self.reply(&PMON_ARGS, true, stdout)
    }

    pub fn compute_apps(self, stdout: &str) -> Self {
        self.reply(&COMPUTE_APPS_ARGS, true, stdout)
    }

    pub fn memory(self, stdout: &str) -> Self {
        self.reply(&MEMORY_ARGS, true, stdout)
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, args: &[&str]) -> gpu_clean::Result<CommandOutput> {
        let key = args.join(" ");
        self.calls.borrow_mut().push(key.clone());
        self.replies.get(&key).cloned().ok_or(Error::ToolUnavailable)
    }
}

/// Records every signal instead of delivering it.
#[derive(Default)]
pub struct RecordingSignaller {
    pub sent: Vec<(u32, TermSignal)>,
    pub missing: Vec<u32>,
    pub refused: Vec<u32>,
}

impl Signaller for RecordingSignaller {
    fn signal(&mut self, pid: u32, signal: TermSignal) -> KillResult {
        self.sent.push((pid, signal));
        if self.missing.contains(&pid) {
            KillResult::NotFound(pid)
        } else if self.refused.contains(&pid) {
            KillResult::Failed(pid, format!("Failed to send {} to PID {pid}", signal.name()))
        } else {
            KillResult::Success(pid, signal.name())
        }
    }
}

pub const THREE_PROCESS_PMON: &str = "\
# gpu         pid   type     sm    mem    enc    dec    command
# Idx           #    C/G      %      %      %      %    name
    0       1001     C     40     30      -      -    python train.py
    0       1002     C     10      5      -      -    python eval.py
    1       1003     G      1      1      -      -    Xorg
";
