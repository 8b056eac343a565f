use crate::smi::process::UNAVAILABLE;
use crate::smi::{GpuMemory, GpuProcess};

pub fn format_memory_line(gpu: &GpuMemory) -> String {
    format!(
        "GPU {}: {}MB / {}MB ({:.1}% used, {}MB free)",
        gpu.device_id,
        gpu.used_mb,
        gpu.total_mb,
        gpu.usage_percent(),
        gpu.free_mb
    )
}

pub fn format_process_line(process: &GpuProcess) -> String {
    let device = or_unavailable(&process.device_id);
    let memory = process.memory_figure().unwrap_or(UNAVAILABLE);
    format!(
        "PID: {:<8} GPU: {:<3} Memory: {:<8} Command: {}",
        process.pid,
        device,
        memory,
        or_unavailable(&process.command)
    )
}

pub fn format_dry_run_line(process: &GpuProcess) -> String {
    format!(
        "  PID: {}, Command: {}",
        process.pid,
        or_unavailable(&process.command)
    )
}

fn or_unavailable(value: &str) -> &str {
    if value.is_empty() { UNAVAILABLE } else { value }
}
