//! Snapshot assembly: one CPU, memory and disk query per refresh

use std::sync::Arc;
use std::time::Instant;

use crate::metrics::{MetricsProvider, ProviderError, SystemMetrics};

/// Runs the three provider queries concurrently on blocking worker threads
/// and joins them into one snapshot. Any failure aborts the whole snapshot.
#[derive(Clone)]
pub struct SnapshotAssembler {
    provider: Arc<dyn MetricsProvider>,
}

impl SnapshotAssembler {
    pub fn new(provider: Arc<dyn MetricsProvider>) -> Self {
        Self { provider }
    }

    /// Wall-clock cost is dominated by the provider's CPU sampling window.
    pub async fn assemble(&self) -> Result<SystemMetrics, ProviderError> {
        let started = Instant::now();

        let (cpu, memory, disk) = tokio::try_join!(
            self.query(|p| p.query_cpu()),
            self.query(|p| p.query_memory()),
            self.query(|p| p.query_disk()),
        )?;

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            cores = cpu.per_core_percent.len(),
            partitions = disk.partitions.len(),
            "assembled snapshot"
        );

        Ok(SystemMetrics { cpu, memory, disk })
    }

    async fn query<T, F>(&self, f: F) -> Result<T, ProviderError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn MetricsProvider) -> Result<T, ProviderError> + Send + 'static,
    {
        let provider = Arc::clone(&self.provider);
        tokio::task::spawn_blocking(move || f(provider.as_ref()))
            .await
            .map_err(|e| ProviderError::Worker(e.to_string()))?
    }
}
