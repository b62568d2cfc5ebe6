//! Dashboard state: the latest snapshot and the widgets that present it

use chrono::{DateTime, Local};

use crate::metrics::SystemMetrics;
use crate::ui::widgets::{DiskTable, ProgressBar};

/// Owned exclusively by the dispatch loop, so it is never locked.
///
/// Widget lists mirror the cardinality of the current snapshot: one CPU bar per
/// logical core and one table row per partition. Both can change between
/// refreshes on hosts with hot-pluggable CPUs or disks.
#[derive(Debug, Clone)]
pub struct DashboardState {
    snapshot: SystemMetrics,
    cpu_bars: Vec<ProgressBar>,
    memory_bar: ProgressBar,
    disk_table: DiskTable,
    bar_width: u16,
    refreshed_at: DateTime<Local>,
}

impl DashboardState {
    pub fn new(snapshot: SystemMetrics, bar_width: u16) -> Self {
        let disk_table = DiskTable::new(&snapshot.disk);
        let mut state = Self {
            snapshot,
            cpu_bars: Vec::new(),
            memory_bar: ProgressBar::new(bar_width),
            disk_table,
            bar_width,
            refreshed_at: Local::now(),
        };
        state.reconcile();
        state
    }

    /// Swap in a new snapshot wholesale and bring the widgets in line with it.
    pub fn apply(&mut self, snapshot: SystemMetrics) {
        self.snapshot = snapshot;
        self.reconcile();
        self.refreshed_at = Local::now();
    }

    /// Resize widget lists to the snapshot, then feed them its values.
    /// Running it twice in a row changes nothing.
    fn reconcile(&mut self) {
        let cpu = &self.snapshot.cpu;
        if cpu.per_core_percent.len() != cpu.logical_cores {
            tracing::debug!(
                samples = cpu.per_core_percent.len(),
                logical = cpu.logical_cores,
                "per-core samples disagree with logical core count"
            );
        }

        let cores = cpu.per_core_percent.len();
        if self.cpu_bars.len() != cores {
            tracing::debug!(from = self.cpu_bars.len(), to = cores, "rebuilding CPU bars");
            self.cpu_bars = vec![ProgressBar::new(self.bar_width); cores];
        }
        for (bar, percent) in self.cpu_bars.iter_mut().zip(&cpu.per_core_percent) {
            bar.set_ratio(percent / 100.0);
        }

        let fraction = self.snapshot.memory.fraction();
        if !fraction.is_finite() {
            tracing::warn!("memory total reported as zero, showing an empty bar");
        }
        self.memory_bar.set_ratio(fraction);

        self.disk_table.update(&self.snapshot.disk);
    }

    pub fn snapshot(&self) -> &SystemMetrics {
        &self.snapshot
    }

    pub fn cpu_bars(&self) -> &[ProgressBar] {
        &self.cpu_bars
    }

    pub fn memory_bar(&self) -> &ProgressBar {
        &self.memory_bar
    }

    pub fn disk_table(&self) -> &DiskTable {
        &self.disk_table
    }

    pub fn refreshed_at(&self) -> DateTime<Local> {
        self.refreshed_at
    }
}
