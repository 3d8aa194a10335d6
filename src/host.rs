//! Host and resource descriptions stored with each record
//!
//! - [`HostInfo`]: machine, user and OS; detected once per process
//! - [`SystemInfo`]: CPU and memory; sampled on every call by a
//!   [`SystemMonitor`]

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde::Serialize;
use std::env;
use sysinfo::{CpuExt, System, SystemExt};

const GIB: f64 = (1u64 << 30) as f64;

/// Machine and user the process runs as
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostInfo {
    /// Network host name
    pub computer_name: Option<String>,
    /// Login name from `USER` or `USERNAME`
    pub user_name: Option<String>,
    /// OS name, e.g. `Ubuntu`
    pub os_name: Option<String>,
    /// Long OS version, e.g. `Linux 22.04 Ubuntu`
    pub os_version: Option<String>,
    /// Kernel release
    pub kernel_version: Option<String>,
}

impl HostInfo {
    /// Query the running system
    pub fn detect() -> Self {
        // Only static system facts are read; no refresh needed.
        let sys = System::new();
        HostInfo {
            computer_name: sys.host_name(),
            user_name: env::var("USER").or_else(|_| env::var("USERNAME")).ok(),
            os_name: sys.name(),
            os_version: sys.long_os_version(),
            kernel_version: sys.kernel_version(),
        }
    }

    /// JSON object form stored in the `host_info` column
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

static HOST_INFO_JSON: OnceCell<Option<String>> = OnceCell::new();

/// Host description of this process as JSON, detected on first use
///
/// `None` if it could not be serialized; that is reported once and never
/// retried.
pub fn host_info_json() -> Option<&'static str> {
    HOST_INFO_JSON
        .get_or_init(|| match HostInfo::detect().to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize host info");
                None
            }
        })
        .as_deref()
}

/// Which resources a [`SystemInfo`] snapshot covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resources {
    /// Usage, core counts and frequency
    pub cpu: bool,
    /// RAM totals and usage
    pub memory: bool,
}

impl Resources {
    /// Check if anything is sampled at all
    pub fn any(&self) -> bool {
        self.cpu || self.memory
    }
}

/// Processor load and topology at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuInfo {
    /// Global usage since the previous sample, e.g. `12.5%`
    pub usage: String,
    /// `None` where the platform does not report it
    pub physical_cores: Option<usize>,
    /// Cores as seen by the scheduler
    pub logical_cores: usize,
    /// Mean current frequency across cores, e.g. `2400.00 MHz`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_frequency: Option<String>,
}

/// RAM figures at one point in time, sizes in GiB
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryInfo {
    /// e.g. `15.54 GB`
    pub total: String,
    /// In use by processes
    pub used: String,
    /// Not allocated at all
    pub free: String,
    /// Used share of total, e.g. `42.10 %`
    pub percent: String,
}

/// JSON object stored in the `system_info` column
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemInfo {
    /// Present when CPU sampling is on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuInfo>,
    /// Present when memory sampling is on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryInfo>,
}

impl SystemInfo {
    /// JSON object form stored in the `system_info` column
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Samples CPU and memory for per-call snapshots
///
/// CPU usage is the load between two refreshes, so the monitor keeps one
/// [`System`] alive and takes a first reading when it is created. Calls
/// from many threads are serialized on it.
pub struct SystemMonitor {
    sys: Mutex<System>,
}

impl SystemMonitor {
    /// Monitor with its first CPU reading taken
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();
        SystemMonitor {
            sys: Mutex::new(sys),
        }
    }

    /// Refresh and read the requested resources
    pub fn snapshot(&self, resources: Resources) -> SystemInfo {
        let mut sys = self.sys.lock();
        let mut info = SystemInfo::default();
        if resources.cpu {
            sys.refresh_cpu();
            info.cpu = Some(cpu_info(&sys));
        }
        if resources.memory {
            sys.refresh_memory();
            info.memory = Some(memory_info(&sys));
        }
        info
    }

    /// Snapshot as JSON; `None` when nothing is requested
    pub fn snapshot_json(&self, resources: Resources) -> Option<String> {
        if !resources.any() {
            return None;
        }
        match self.snapshot(resources).to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize system info");
                None
            }
        }
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SystemMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemMonitor").finish_non_exhaustive()
    }
}

fn cpu_info(sys: &System) -> CpuInfo {
    let cpus = sys.cpus();
    let mean_mhz = if cpus.is_empty() {
        0
    } else {
        cpus.iter().map(|c| c.frequency()).sum::<u64>() / cpus.len() as u64
    };
    CpuInfo {
        usage: format!("{:.1}%", sys.global_cpu_info().cpu_usage()),
        physical_cores: sys.physical_core_count(),
        logical_cores: cpus.len(),
        current_frequency: (mean_mhz > 0).then(|| format!("{:.2} MHz", mean_mhz as f64)),
    }
}

fn memory_info(sys: &System) -> MemoryInfo {
    let total = sys.total_memory();
    let used = sys.used_memory();
    let percent = if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    };
    MemoryInfo {
        total: format!("{:.2} GB", total as f64 / GIB),
        used: format!("{:.2} GB", used as f64 / GIB),
        free: format!("{:.2} GB", sys.free_memory() as f64 / GIB),
        percent: format!("{:.2} %", percent),
    }
}
