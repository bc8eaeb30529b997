//! NVIDIA GPU probe backed by `nvidia-smi`.
//!
//! Two queries are issued:
//!
//! | Query                      | `nvidia-smi` arguments                                              |
//! |----------------------------|---------------------------------------------------------------------|
//! | [`SmiQuery::DriverVersion`] | `--query-gpu=driver_version --format=csv,noheader`                  |
//! | [`SmiQuery::Devices`]       | `--query-gpu=name,memory.total,memory.free,memory.used,temperature.gpu,pstate --format=csv,noheader,nounits` |
//!
//! With `nounits`, memory columns are in MiB; they are converted to bytes so
//! the report matches what NVML returns.

use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use std::string::FromUtf8Error;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

const MIB: u64 = 1024 * 1024;

/// Number of columns in a [`SmiQuery::Devices`] row.
const DEVICE_COLUMNS: usize = 6;

/// Errors raised while querying the GPU tool.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The tool could not be started (usually: not installed).
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but reported failure (e.g. no driver loaded).
    #[error("{program} exited with {status}: {stderr}")]
    ExitStatus {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The tool wrote output that is not UTF-8.
    #[error("{program} produced non-UTF-8 output")]
    Utf8 {
        program: String,
        #[source]
        source: FromUtf8Error,
    },

    /// A row of output could not be parsed.
    #[error("malformed device row {line:?}: {reason}")]
    Malformed { line: String, reason: String },
}

/// The queries the probe needs from the vendor tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmiQuery {
    DriverVersion,
    Devices,
}

impl SmiQuery {
    /// Command-line arguments for this query.
    pub fn args(self) -> &'static [&'static str] {
        match self {
            SmiQuery::DriverVersion => &["--query-gpu=driver_version", "--format=csv,noheader"],
            SmiQuery::Devices => &[
                "--query-gpu=name,memory.total,memory.free,memory.used,temperature.gpu,pstate",
                "--format=csv,noheader,nounits",
            ],
        }
    }
}

/// Runs a query against the GPU tool and returns its stdout.
#[cfg_attr(test, mockall::automock)]
pub trait SmiRunner {
    /// # Errors
    ///
    /// Returns [`ProbeError`] if the tool cannot be run or fails.
    fn run(&self, query: SmiQuery) -> Result<String, ProbeError>;
}

/// [`SmiRunner`] that launches the `nvidia-smi` executable.
#[derive(Debug, Clone)]
pub struct NvidiaSmi {
    program: PathBuf,
}

impl NvidiaSmi {
    /// Uses `nvidia-smi` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("nvidia-smi")
    }

    /// Uses the executable at `program`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NvidiaSmi {
    fn default() -> Self {
        Self::new()
    }
}

impl SmiRunner for NvidiaSmi {
    fn run(&self, query: SmiQuery) -> Result<String, ProbeError> {
        let program = self.program.display().to_string();
        debug!(%program, ?query, "querying GPU tool");

        let output = Command::new(&self.program)
            .args(query.args())
            .output()
            .map_err(|source| ProbeError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::ExitStatus {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|source| ProbeError::Utf8 { program, source })
    }
}

/// Snapshot of one GPU.
///
/// Serialized field names follow the report layout consumed by training
/// dashboards (`gpu_name`, `powerStatus`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GpuDevice {
    #[serde(rename = "gpu_name")]
    pub name: String,
    /// Total memory in bytes.
    pub total: u64,
    /// Free memory in bytes.
    pub free: u64,
    /// Used memory in bytes.
    pub used: u64,
    /// Core temperature, formatted as `"<degrees>℃"`.
    pub temperature: String,
    /// Performance state index (0 = maximum performance, 15 = minimum).
    #[serde(rename = "powerStatus")]
    pub power_state: u32,
}

impl GpuDevice {
    /// Fraction of memory in use, or `None` when total memory is reported as
    /// zero.
    pub fn memory_used_rate(&self) -> Option<f64> {
        (self.total > 0).then(|| self.used as f64 / self.total as f64)
    }
}

/// Result of a GPU probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NvidiaInfo {
    /// `false` if any part of the probe failed.
    pub state: bool,
    #[serde(rename = "nvidia_version")]
    pub driver_version: String,
    #[serde(rename = "nvidia_count")]
    pub device_count: usize,
    pub gpus: Vec<GpuDevice>,
}

impl Default for NvidiaInfo {
    fn default() -> Self {
        Self {
            state: true,
            driver_version: String::new(),
            device_count: 0,
            gpus: Vec::new(),
        }
    }
}

/// Probes installed GPUs.
///
/// Never fails: any error marks the report with `state == false`, keeping
/// whatever was collected before the failure.
pub fn nvidia_info(runner: &dyn SmiRunner) -> NvidiaInfo {
    let mut info = NvidiaInfo::default();
    if let Err(e) = collect(runner, &mut info) {
        warn!("GPU probe failed: {e}");
        info.state = false;
    }
    info
}

fn collect(runner: &dyn SmiRunner, info: &mut NvidiaInfo) -> Result<(), ProbeError> {
    let version = runner.run(SmiQuery::DriverVersion)?;
    info.driver_version = version
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string();

    let devices = runner.run(SmiQuery::Devices)?;
    let rows: Vec<&str> = devices
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    info.device_count = rows.len();
    for row in rows {
        info.gpus.push(parse_device_row(row)?);
    }
    Ok(())
}

/// Parses one `name, total, free, used, temperature, pstate` row.
///
/// The name is the only column that may itself contain commas, so the row is
/// split from the right.
fn parse_device_row(line: &str) -> Result<GpuDevice, ProbeError> {
    let malformed = |reason: String| ProbeError::Malformed {
        line: line.to_string(),
        reason,
    };

    let mut columns: Vec<&str> = line.rsplitn(DEVICE_COLUMNS, ',').map(str::trim).collect();
    if columns.len() != DEVICE_COLUMNS {
        return Err(malformed(format!(
            "expected {DEVICE_COLUMNS} columns, got {}",
            columns.len()
        )));
    }
    columns.reverse();

    let mib = |index: usize, label: &str| -> Result<u64, ProbeError> {
        let value = columns[index]
            .parse::<u64>()
            .map_err(|e| malformed(format!("{label}: {e}")))?;
        value
            .checked_mul(MIB)
            .ok_or_else(|| malformed(format!("{label}: {value} MiB does not fit in bytes")))
    };
    let total = mib(1, "memory.total")?;
    let free = mib(2, "memory.free")?;
    let used = mib(3, "memory.used")?;

    let temperature: u32 = columns[4]
        .parse()
        .map_err(|e| malformed(format!("temperature.gpu: {e}")))?;

    let power_state = columns[5]
        .strip_prefix('P')
        .and_then(|n| n.parse::<u32>().ok())
        .ok_or_else(|| malformed(format!("pstate: unexpected value {:?}", columns[5])))?;

    Ok(GpuDevice {
        name: columns[0].to_string(),
        total,
        free,
        used,
        temperature: format!("{temperature}℃"),
        power_state,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
