use super::{Parsed, split_csv};

/// Placeholder for fields nvidia-smi did not report.
pub const UNAVAILABLE: &str = "N/A";

/// Device index assigned to compute-app rows, which only carry a GPU UUID.
pub const COMPUTE_APP_DEVICE_ID: &str = "0";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GpuProcess {
    pub device_id: String,
    /// Kept textual; converted to an OS pid only when signalling.
    pub pid: String,
    pub command: String,
    pub source: ProcessSource,
}

/// Fields that only one of the two enumeration modes can provide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessSource {
    Monitor(MonitorSample),
    ComputeApp {
        gpu_uuid: String,
        used_memory: String,
    },
}

/// One `pmon` sample. Utilizations are kept as printed (`-` when idle).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorSample {
    pub kind: String,
    pub sm: String,
    pub mem: String,
    pub enc: String,
    pub dec: String,
}

impl GpuProcess {
    pub fn kind(&self) -> Option<&str> {
        match &self.source {
            ProcessSource::Monitor(sample) => Some(&sample.kind),
            ProcessSource::ComputeApp { .. } => None,
        }
    }

    /// Used memory (MiB) for compute-app rows, memory utilization for pmon rows.
    pub fn memory_figure(&self) -> Option<&str> {
        let figure = match &self.source {
            ProcessSource::ComputeApp { used_memory, .. } => used_memory.as_str(),
            ProcessSource::Monitor(sample) => sample.mem.as_str(),
        };
        (!figure.is_empty()).then_some(figure)
    }
}

/// Parse `nvidia-smi pmon` output.
///
/// Columns are `gpu pid type sm mem enc dec command...`. Header lines start
/// with `#`. Rows with fewer than seven columns are skipped. The `-` pid
/// rows pmon prints for idle devices are kept as-is.
pub fn parse_pmon(output: &str) -> Parsed<GpuProcess> {
    let mut parsed = Parsed::default();

    for line in output.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 7 {
            parsed.skipped += 1;
            continue;
        }

        let command = if parts.len() > 7 {
            parts[7..].join(" ")
        } else {
            UNAVAILABLE.to_string()
        };

        parsed.records.push(GpuProcess {
            device_id: parts[0].to_string(),
            pid: parts[1].to_string(),
            command,
            source: ProcessSource::Monitor(MonitorSample {
                kind: parts[2].to_string(),
                sm: parts[3].to_string(),
                mem: parts[4].to_string(),
                enc: parts[5].to_string(),
                dec: parts[6].to_string(),
            }),
        });
    }

    parsed
}

/// Parse `--query-compute-apps=pid,process_name,gpu_uuid,used_memory` CSV rows.
pub fn parse_compute_apps(output: &str) -> Parsed<GpuProcess> {
    let mut parsed = Parsed::default();

    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        let fields = split_csv(line);
        if fields.len() < 4 {
            parsed.skipped += 1;
            continue;
        }

        parsed.records.push(GpuProcess {
            device_id: COMPUTE_APP_DEVICE_ID.to_string(),
            pid: fields[0].to_string(),
            command: fields[1].to_string(),
            source: ProcessSource::ComputeApp {
                gpu_uuid: fields[2].to_string(),
                used_memory: fields[3].to_string(),
            },
        });
    }

    parsed
}
