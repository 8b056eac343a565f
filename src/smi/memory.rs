use super::{Parsed, split_csv};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GpuMemory {
    pub device_id: String,
    pub used_mb: u64,
    pub total_mb: u64,
    pub free_mb: u64,
}

impl GpuMemory {
    /// Used share of total memory, rounded to one decimal place.
    pub fn usage_percent(&self) -> f64 {
        if self.total_mb == 0 {
            return 0.0;
        }
        let percent = self.used_mb as f64 / self.total_mb as f64 * 100.0;
        (percent * 10.0).round() / 10.0
    }
}

/// Parse `--query-gpu=index,memory.used,memory.total,memory.free` CSV rows.
///
/// Rows whose figures are not plain integers (`[N/A]` on some boards) are
/// skipped along with short rows.
pub fn parse_memory_query(output: &str) -> Parsed<GpuMemory> {
    let mut parsed = Parsed::default();

    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        let fields = split_csv(line);
        let record = match fields.as_slice() {
            [index, used, total, free, ..] => match (used.parse(), total.parse(), free.parse()) {
                (Ok(used_mb), Ok(total_mb), Ok(free_mb)) => Some(GpuMemory {
                    device_id: index.to_string(),
                    used_mb,
                    total_mb,
                    free_mb,
                }),
                _ => None,
            },
            _ => None,
        };

        match record {
            Some(record) => parsed.records.push(record),
            None => parsed.skipped += 1,
        }
    }

    parsed
}
