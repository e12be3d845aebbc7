//! System resource metrics for the system panel.
//!
//! On Linux the numbers come from `/proc` and `statvfs(3)`. Elsewhere the
//! provider still works but reports zeros for what it cannot read and no
//! load average.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// One reading of the machine's resource usage.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemMetrics {
    pub cpu_percent: f64,
    pub ram_used: u64,
    pub ram_total: u64,
    pub disk_used: u64,
    pub disk_total: u64,
    /// 1, 5 and 15 minute load averages where the platform has them
    pub load_avg: Option<[f64; 3]>,
    /// Time since the dashboard started
    pub uptime: Duration,
}

impl SystemMetrics {
    pub fn ram_percent(&self) -> f64 {
        percent(self.ram_used, self.ram_total)
    }

    pub fn disk_percent(&self) -> f64 {
        percent(self.disk_used, self.disk_total)
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    }
}

/// Source of [`SystemMetrics`].
pub trait MetricsProvider {
    fn sample(&mut self) -> SystemMetrics;
}

/// Severity of a usage percentage against configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    Normal,
    Warning,
    Critical,
}

pub fn usage_level(percent: f64, warning: f64, critical: f64) -> UsageLevel {
    if percent >= critical {
        UsageLevel::Critical
    } else if percent >= warning {
        UsageLevel::Warning
    } else {
        UsageLevel::Normal
    }
}

/// Cumulative CPU jiffies from the `cpu` line of `/proc/stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuTimes {
    pub busy: u64,
    pub total: u64,
}

impl CpuTimes {
    /// Busy share between two readings; a first reading is measured since boot.
    pub fn usage_since(&self, previous: Option<CpuTimes>) -> f64 {
        let base = previous.unwrap_or_default();
        let total = self.total.saturating_sub(base.total);
        let busy = self.busy.saturating_sub(base.busy);
        if total == 0 {
            return 0.0;
        }
        (busy as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    }
}

/// [`MetricsProvider`] reading `/proc` and the filesystem holding `disk_path`.
#[derive(Debug)]
pub struct ProcMetrics {
    disk_path: PathBuf,
    started: Instant,
    last_cpu: Option<CpuTimes>,
}

impl ProcMetrics {
    pub fn new(disk_path: impl Into<PathBuf>) -> Self {
        Self {
            disk_path: disk_path.into(),
            started: Instant::now(),
            last_cpu: None,
        }
    }
}

impl MetricsProvider for ProcMetrics {
    fn sample(&mut self) -> SystemMetrics {
        let cpu_percent = match fs::read_to_string("/proc/stat")
            .ok()
            .and_then(|s| parse_cpu_times(&s))
        {
            Some(times) => {
                let usage = times.usage_since(self.last_cpu);
                self.last_cpu = Some(times);
                usage
            }
            None => 0.0,
        };

        let (ram_total, ram_used) = fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|s| parse_meminfo(&s))
            .unwrap_or((0, 0));

        let (disk_total, disk_used) = disk_usage(&self.disk_path).unwrap_or((0, 0));

        let load_avg = fs::read_to_string("/proc/loadavg")
            .ok()
            .and_then(|s| parse_loadavg(&s));

        SystemMetrics {
            cpu_percent,
            ram_used,
            ram_total,
            disk_used,
            disk_total,
            load_avg,
            uptime: self.started.elapsed(),
        }
    }
}

/// Parse the aggregate `cpu` line of `/proc/stat`.
pub fn parse_cpu_times(stat: &str) -> Option<CpuTimes> {
    let line = stat.lines().find(|l| l.starts_with("cpu "))?;
    let values: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .filter_map(|v| v.parse().ok())
        .collect();
    if values.len() < 4 {
        return None;
    }
    // idle + iowait
    let idle = values[3] + values.get(4).copied().unwrap_or(0);
    // guest time is already counted in user/nice
    let total: u64 = values.iter().take(8).sum();
    Some(CpuTimes {
        busy: total.saturating_sub(idle),
        total,
    })
}

/// `(total, used)` bytes from `/proc/meminfo`, where used = total - available.
pub fn parse_meminfo(meminfo: &str) -> Option<(u64, u64)> {
    let field = |name: &str| -> Option<u64> {
        meminfo
            .lines()
            .find_map(|l| l.strip_prefix(name))
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|v| v.parse::<u64>().ok())
    };
    let total_kib = field("MemTotal:")?;
    let avail_kib = field("MemAvailable:").or_else(|| field("MemFree:"))?;
    let total = total_kib * 1024;
    Some((total, total.saturating_sub(avail_kib * 1024)))
}

pub fn parse_loadavg(loadavg: &str) -> Option<[f64; 3]> {
    let mut parts = loadavg.split_whitespace().map(|v| v.parse::<f64>().ok());
    Some([parts.next()??, parts.next()??, parts.next()??])
}

/// `(total, used)` bytes of the filesystem containing `path`.
#[cfg(unix)]
pub fn disk_usage(path: &Path) -> Option<(u64, u64)> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes()).ok()?;
    let mut st: libc::statvfs = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut st) };
    if rc != 0 {
        return None;
    }

    let frsize = st.f_frsize as u128;
    let total = (st.f_blocks as u128).saturating_mul(frsize);
    let avail = (st.f_bavail as u128).saturating_mul(frsize);
    let used = total.saturating_sub(avail);
    Some((
        u64::try_from(total).unwrap_or(u64::MAX),
        u64::try_from(used).unwrap_or(u64::MAX),
    ))
}

#[cfg(not(unix))]
pub fn disk_usage(_path: &Path) -> Option<(u64, u64)> {
    None
}

/// Human-readable size with one decimal: `512.0 B`, `1.5 KB`, `2.0 GB`.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if value < 1024.0 {
            return format!("{:.1} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.1} PB", value)
}

/// `Xd Yh Zm`, `Yh Zm` or `Zm Ss`.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, seconds)
    }
}
