//! Host metrics provider backed by `sysinfo` (and `statvfs` on unix).

use parking_lot::Mutex;
use std::path::Path;
use std::time::Duration;
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};

use crate::metrics::{
    collect_partitions, CpuMetrics, DiskMetrics, DiskUsage, MemoryMetrics, MetricsProvider, Mount,
    ProviderError,
};

/// OS files sysinfo reads the mount table and memory counters from. sysinfo
/// reports an unreadable source as an empty result instead of an error.
#[cfg(target_os = "linux")]
const MOUNT_TABLE: Option<&str> = Some("/proc/mounts");
#[cfg(target_os = "linux")]
const MEMORY_COUNTERS: Option<&str> = Some("/proc/meminfo");
#[cfg(not(target_os = "linux"))]
const MOUNT_TABLE: Option<&str> = None;
#[cfg(not(target_os = "linux"))]
const MEMORY_COUNTERS: Option<&str> = None;

/// Keeps reusable `sysinfo` handles so that every query does not reallocate.
///
/// CPU and memory use separate `System` instances so the three queries can run
/// on different worker threads without contending for one lock.
pub struct SysinfoProvider {
    cpu: Mutex<System>,
    memory: Mutex<System>,
    disks: Mutex<Disks>,
    sample_window: Duration,
}

impl SysinfoProvider {
    pub fn new(sample_window: Duration) -> Self {
        let cpu = System::new_with_specifics(
            RefreshKind::new().with_cpu(CpuRefreshKind::everything()),
        );
        let memory = System::new_with_specifics(
            RefreshKind::new().with_memory(MemoryRefreshKind::everything()),
        );

        Self {
            cpu: Mutex::new(cpu),
            memory: Mutex::new(memory),
            disks: Mutex::new(Disks::new()),
            sample_window: sample_window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }

    pub fn sample_window(&self) -> Duration {
        self.sample_window
    }
}

impl MetricsProvider for SysinfoProvider {
    fn query_cpu(&self) -> Result<CpuMetrics, ProviderError> {
        let mut sys = self.cpu.lock();

        // Usage is the busy-time delta between two readings one window apart.
        sys.refresh_cpu_frequency();
        sys.refresh_cpu_usage();
        std::thread::sleep(self.sample_window);
        sys.refresh_cpu_usage();

        let cpus = sys.cpus();
        let Some(first) = cpus.first() else {
            return Err(ProviderError::Cpu("no CPUs reported by the OS".to_string()));
        };

        let per_core_percent: Vec<f64> = cpus.iter().map(|c| c.cpu_usage() as f64).collect();
        let logical_cores = per_core_percent.len();

        Ok(CpuMetrics {
            model_name: first.brand().trim().to_string(),
            frequency_mhz: first.frequency() as f64,
            physical_cores: sys.physical_core_count().unwrap_or(logical_cores),
            logical_cores,
            per_core_percent,
        })
    }

    fn query_memory(&self) -> Result<MemoryMetrics, ProviderError> {
        let mut sys = self.memory.lock();
        sys.refresh_memory();

        let total_bytes = sys.total_memory();
        if total_bytes == 0 {
            ensure_readable(MEMORY_COUNTERS.map(Path::new), ProviderError::Memory)?;
        }

        Ok(MemoryMetrics {
            used_bytes: sys.used_memory(),
            total_bytes,
        })
    }

    fn query_disk(&self) -> Result<DiskMetrics, ProviderError> {
        let mut disks = self.disks.lock();
        disks.refresh_list();

        let mounts: Vec<Mount> = disks
            .list()
            .iter()
            .map(|disk| Mount {
                device: disk.name().to_string_lossy().into_owned(),
                mount_point: disk.mount_point().to_string_lossy().into_owned(),
                fs_type: disk.file_system().to_string_lossy().into_owned(),
            })
            .collect();

        mounted_partitions(mounts, MOUNT_TABLE.map(Path::new), |mount| {
            partition_usage(mount, &disks)
        })
    }
}

/// An empty mount list is a valid reading unless the mount table itself
/// could not be read.
fn mounted_partitions<F>(
    mounts: Vec<Mount>,
    mount_table: Option<&Path>,
    usage: F,
) -> Result<DiskMetrics, ProviderError>
where
    F: FnMut(&Mount) -> Result<DiskUsage, ProviderError>,
{
    if mounts.is_empty() {
        ensure_readable(mount_table, ProviderError::DiskEnumeration)?;
        tracing::debug!("no eligible partitions mounted");
        return Ok(DiskMetrics::default());
    }
    Ok(collect_partitions(mounts, usage))
}

/// Turn an empty sysinfo reading into `failed` when its OS source can't be opened.
fn ensure_readable(
    source: Option<&Path>,
    failed: fn(String) -> ProviderError,
) -> Result<(), ProviderError> {
    let Some(path) = source else {
        return Ok(());
    };
    match std::fs::File::open(path) {
        Ok(_) => Ok(()),
        Err(e) => Err(failed(format!("{}: {}", path.display(), e))),
    }
}

/// Usage of one mount, read the way `df` does: totals from fragment counts,
/// "free" as the space available to unprivileged users.
#[cfg(unix)]
fn partition_usage(mount: &Mount, _disks: &Disks) -> Result<DiskUsage, ProviderError> {
    let stat = nix::sys::statvfs::statvfs(mount.mount_point.as_str()).map_err(|errno| {
        ProviderError::PartitionUsage {
            mount: mount.mount_point.clone(),
            reason: errno.desc().to_string(),
        }
    })?;

    let fragment = stat.fragment_size() as u64;
    let blocks = stat.blocks() as u64;
    let blocks_free = stat.blocks_free() as u64;

    Ok(DiskUsage {
        total_bytes: blocks * fragment,
        free_bytes: stat.blocks_available() as u64 * fragment,
        used_bytes: blocks.saturating_sub(blocks_free) * fragment,
    })
}

#[cfg(not(unix))]
fn partition_usage(mount: &Mount, disks: &Disks) -> Result<DiskUsage, ProviderError> {
    let disk = disks
        .list()
        .iter()
        .find(|d| d.mount_point() == std::path::Path::new(&mount.mount_point))
        .ok_or_else(|| ProviderError::PartitionUsage {
            mount: mount.mount_point.clone(),
            reason: "no longer mounted".to_string(),
        })?;

    let total = disk.total_space();
    let available = disk.available_space();

    Ok(DiskUsage {
        used_bytes: total.saturating_sub(available),
        total_bytes: total,
        free_bytes: available,
    })
}
