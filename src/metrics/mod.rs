//! Metrics data model and the provider contract the dashboard samples from

use thiserror::Error;

/// One fully assembled set of readings for a single refresh cycle.
///
/// Snapshots are never patched in place: every refresh builds a new one and
/// the dashboard swaps it in wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemMetrics {
    pub cpu: CpuMetrics,
    pub memory: MemoryMetrics,
    pub disk: DiskMetrics,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CpuMetrics {
    pub model_name: String,
    pub frequency_mhz: f64,
    pub physical_cores: usize,
    pub logical_cores: usize,
    /// One entry per logical core, each in `0..=100`.
    pub per_core_percent: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryMetrics {
    pub used_bytes: u64,
    pub total_bytes: u64,
}

impl MemoryMetrics {
    /// Raw `used / total`. Yields NaN when `total_bytes == 0`; drawing code
    /// decides how to clamp.
    pub fn fraction(&self) -> f64 {
        self.used_bytes as f64 / self.total_bytes as f64
    }
}

/// Mounted partitions, in the provider's enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiskMetrics {
    pub partitions: Vec<PartitionMetrics>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionMetrics {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub free_bytes: u64,
}

/// A mounted partition as enumerated, before its usage has been queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub free_bytes: u64,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("failed to query CPU metrics: {0}")]
    Cpu(String),
    #[error("failed to query memory metrics: {0}")]
    Memory(String),
    #[error("failed to enumerate disk partitions: {0}")]
    DiskEnumeration(String),
    #[error("failed to query usage of {mount}: {reason}")]
    PartitionUsage { mount: String, reason: String },
    #[error("metrics worker did not complete: {0}")]
    Worker(String),
}

/// Blocking access to host metrics.
///
/// Each query is independent and may fail on its own. `query_cpu` blocks for
/// the provider's sampling window (one second by default) so that per-core
/// busy percentages can be computed from two readings.
#[cfg_attr(test, mockall::automock)]
pub trait MetricsProvider: Send + Sync {
    fn query_cpu(&self) -> Result<CpuMetrics, ProviderError>;

    fn query_memory(&self) -> Result<MemoryMetrics, ProviderError>;

    /// Mounted, non-pseudo partitions with their usage. Partitions whose usage
    /// cannot be read are left out; only a failed enumeration is an error.
    fn query_disk(&self) -> Result<DiskMetrics, ProviderError>;
}

/// Pair every mount with its usage, dropping mounts whose usage query fails.
///
/// One unreadable mount (a stale network share, a permission-restricted
/// container path) must not blank the whole disk panel.
pub fn collect_partitions<F>(mounts: Vec<Mount>, mut usage: F) -> DiskMetrics
where
    F: FnMut(&Mount) -> Result<DiskUsage, ProviderError>,
{
    let partitions = mounts
        .into_iter()
        .filter_map(|mount| match usage(&mount) {
            Ok(u) => Some(PartitionMetrics {
                device: mount.device,
                mount_point: mount.mount_point,
                fs_type: mount.fs_type,
                used_bytes: u.used_bytes,
                total_bytes: u.total_bytes,
                free_bytes: u.free_bytes,
            }),
            Err(e) => {
                tracing::warn!(mount = %mount.mount_point, "skipping partition: {}", e);
                None
            }
        })
        .collect();

    DiskMetrics { partitions }
}
