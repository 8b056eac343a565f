use std::io::Write;

use crate::error::Result;
use crate::format::{format_memory_line, format_process_line};
use crate::smi::{CommandRunner, GpuMemory, GpuProcess, NvidiaSmi};

/// Print per-device memory usage followed by the GPU process list.
pub async fn display_status<R: CommandRunner, W: Write>(
    smi: &NvidiaSmi<R>,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "=== GPU Memory Status ===")?;
    let memory = smi.list_memory().await?;
    write_memory_section(out, &memory)?;

    writeln!(out, "\n=== GPU Processes ===")?;
    let processes = smi.list_processes().await?;
    write_process_section(out, &processes)?;
    Ok(())
}

pub fn write_memory_section<W: Write>(out: &mut W, memory: &[GpuMemory]) -> Result<()> {
    for gpu in memory {
        writeln!(out, "{}", format_memory_line(gpu))?;
    }
    Ok(())
}

pub fn write_process_section<W: Write>(out: &mut W, processes: &[GpuProcess]) -> Result<()> {
    if processes.is_empty() {
        writeln!(out, "No GPU processes found")?;
        return Ok(());
    }
    for process in processes {
        writeln!(out, "{}", format_process_line(process))?;
    }
    Ok(())
}
